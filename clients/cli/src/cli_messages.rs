//! CLI command messaging
//!
//! Consistent coloured output for the one-shot commands (`portfolio`,
//! `conditions`, `config`, ...). Errors go to stderr, everything else to
//! stdout so command output can be piped.

const INFO: &str = "\x1b[1;33m[INFO]\x1b[0m";
const WARN: &str = "\x1b[1;91m[WARN]\x1b[0m";
const ERROR: &str = "\x1b[1;31m[ERROR]\x1b[0m";
const SUCCESS: &str = "\x1b[1;32m[SUCCESS]\x1b[0m";

fn titled_line(tag: &str, title: &str, details: &str) -> String {
    if details.is_empty() {
        format!("{} {}", tag, title)
    } else {
        format!("{} {}\t {}", tag, title, details)
    }
}

pub fn print_info(title: &str, details: &str) {
    println!("{}", titled_line(INFO, title, details));
}

pub fn print_warn(title: &str, details: &str) {
    eprintln!("{}", titled_line(WARN, title, details));
}

pub fn print_error(title: &str, details: Option<&str>) {
    eprintln!("{} {}", ERROR, title);
    if let Some(details) = details {
        eprintln!("{} Details: {}", ERROR, details);
    }
}

/// The server's confirmation for a create, update or delete.
pub fn print_success(title: &str, details: &str) {
    println!("{}", titled_line(SUCCESS, title, details));
}

#[macro_export]
macro_rules! print_cmd_info {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_info($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_warn {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_warn($title, &format!($($details)*))
    };
}

#[macro_export]
macro_rules! print_cmd_error {
    ($title:expr) => {
        $crate::cli_messages::print_error($title, None)
    };
    ($title:expr, $details:expr) => {
        $crate::cli_messages::print_error($title, Some($details))
    };
}

#[macro_export]
macro_rules! print_cmd_success {
    ($title:expr, $($details:tt)*) => {
        $crate::cli_messages::print_success($title, &format!($($details)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_details_print_title_only() {
        assert_eq!(titled_line("[T]", "Saved", ""), "[T] Saved");
        assert_eq!(titled_line("[T]", "Saved", "ok"), "[T] Saved\t ok");
    }
}
