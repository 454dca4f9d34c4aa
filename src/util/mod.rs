pub mod nagios;
pub mod report;
