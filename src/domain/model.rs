use crate::domain::AppError;
use crate::utils::archive_file_name;

/// One of the static-data bundles offered by the open data portal.
///
/// The set is closed: adding a report means adding a variant here, and the
/// compiler will point at every match that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Fares,
    RouteingGuide,
    Timetable,
}

impl Report {
    pub const ALL: [Report; 3] = [Report::Fares, Report::RouteingGuide, Report::Timetable];

    /// Human-readable name, as shown by the shell.
    pub fn label(&self) -> &'static str {
        match self {
            Report::Fares => "Fares",
            Report::RouteingGuide => "Routeing Guide",
            Report::Timetable => "Timetable",
        }
    }

    /// Fixed portal path of this report's feed.
    pub fn feed_path(&self) -> &'static str {
        match self {
            Report::Fares => "/api/staticfeeds/2.0/fares",
            Report::RouteingGuide => "/api/staticfeeds/2.0/routeing",
            Report::Timetable => "/api/staticfeeds/3.0/timetable",
        }
    }

    /// Filename the downloaded archive is saved under.
    pub fn archive_name(&self) -> String {
        archive_file_name(self.label())
    }

    /// Resolve a report by its display name.
    ///
    /// A shell driving this crate only offers the closed set above, so a
    /// miss here indicates a programming error on its side.
    pub fn from_label(name: &str) -> Result<Report, AppError> {
        Report::ALL
            .into_iter()
            .find(|report| report.label() == name)
            .ok_or_else(|| AppError::UnknownReport(name.to_string()))
    }
}
