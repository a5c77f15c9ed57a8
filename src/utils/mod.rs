/// Normalize a report name into its on-disk archive filename:
/// lower-cased, spaces replaced with underscores, `.zip` appended.
pub fn archive_file_name(name: &str) -> String {
    format!("{}.zip", name.to_lowercase().replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_file_name() {
        assert_eq!(archive_file_name("Fares"), "fares.zip");
        assert_eq!(archive_file_name("Routeing Guide"), "routeing_guide.zip");
    }
}
