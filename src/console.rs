pub mod console_progress_reporter;
pub mod report_printer;

pub use console_progress_reporter::ConsoleProgressReporter;
pub use report_printer::{print_report, write_report};
