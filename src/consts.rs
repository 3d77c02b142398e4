/// Number of months in a year, and the required length of every month vocabulary
pub const MONTHS_PER_YEAR: usize = 12;

/// Minimum valid month (January)
pub const MIN_MONTH: u8 = 1;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Years per century, used by two-digit year resolution
pub(crate) const CENTURY: i32 = 100;

/// Minimum digit count accepted and printed for a `YYYY` token
pub(crate) const FULL_YEAR_DIGITS: usize = 4;
/// Exact digit count of a `YY` token
pub(crate) const SHORT_YEAR_DIGITS: usize = 2;
/// Maximum digit count of an `M`/`MM` token
pub(crate) const MONTH_DIGITS: usize = 2;

/// Separator of the ISO 8601 `YYYY-MM` value form
pub const DATE_SEPARATOR: char = '-';
/// Separator between the bounds of a textual year range (`2020/2026`)
pub const RANGE_SEPARATOR: char = '/';

/// Pattern used when no format has been configured
pub const DEFAULT_PATTERN: &str = "YYYY-MM";

/// Reason text for input that matches none of the configured patterns
pub const UNPARSEABLE: &str = "unparseable";

/// Default full month names (`MMMM`)
pub const ENGLISH_MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Default abbreviated month names (`MMM`), also the default overlay labels
pub const ENGLISH_SHORT_MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
