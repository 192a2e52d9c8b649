//! Application constants for the port receiving pipeline
//!
//! This module contains column labels, business-rule thresholds, the PRN export
//! mapping and output file names used throughout the application.

// =============================================================================
// Input Defaults
// =============================================================================

/// Sheet that holds the supervision records in the exported workbook
pub const DEFAULT_SHEET_NAME: &str = "RawData";

/// Physical rows skipped before the header row (the export carries a title row)
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Extensions dispatched to the workbook loader
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

// =============================================================================
// Column Labels
// =============================================================================

/// Logical column labels matched case-insensitively by substring
pub mod labels {
    pub const BAG_ID: &str = "bag id";
    pub const HORSE_REGISTRATION: &str = "receiving horse registration";
    pub const KICO_SEAL: &str = "kico seal no.";
    pub const ADDED_TIME: &str = "added time";

    /// Labels that must all resolve before any output is produced
    pub const REQUIRED: &[&str] = &[BAG_ID, HORSE_REGISTRATION, KICO_SEAL, ADDED_TIME];
}

/// Alternate spelling of the offload date column seen in older exports
pub const OFFLOAD_DATE_ALIAS: &str = "BAG OFFLOADING DATE";

/// Canonical offload date column name used by the export mapping
pub const OFFLOAD_DATE_COLUMN: &str = "BAG OFFLOADED DATE";

/// Derived column holding the effective identifier of each record
pub const EFFECTIVE_ID_COLUMN: &str = "Bag Scanned & Manual";

/// Parsed attribute used as the effective identifier for long bag ids
pub const BAG_ATTRIBUTE: &str = "Bag";

/// Parsed attribute collected into the duplicate report
pub const LOT_ATTRIBUTE: &str = "Lot";

// =============================================================================
// Identifier Thresholds
// =============================================================================

/// Raw identifiers longer than this use their parsed `Bag` attribute
pub const DEFAULT_EFFECTIVE_ID_MIN_LENGTH: usize = 20;

/// Inclusive lower bound of the suspicious identifier length band
pub const DEFAULT_FLAG_MIN_LENGTH: usize = 16;

/// Inclusive upper bound of the suspicious identifier length band
pub const DEFAULT_FLAG_MAX_LENGTH: usize = 24;

// =============================================================================
// Bag Identifier Grammar
// =============================================================================

/// Separator between attribute segments
pub const SEGMENT_SEPARATOR: char = ',';

/// `key=value` attribute separator
pub const EQUALS_SEPARATOR: &str = "=";

/// `key: value` attribute separator
pub const COLON_SEPARATOR: &str = ": ";

// =============================================================================
// Reports
// =============================================================================

/// Column headers of the duplicate exception report
pub mod duplicate_columns {
    pub const ADDED_TIME: &str = "Added Time";
    pub const EFFECTIVE_ID: &str = super::EFFECTIVE_ID_COLUMN;
    pub const SEAL_NUMBERS: &str = "KICO SEAL NO.";
    pub const HORSE_REGISTRATIONS: &str = "Horse Registration IDs";
    pub const LOT_IDS: &str = "Lot IDs";

    pub const ALL: &[&str] = &[
        ADDED_TIME,
        EFFECTIVE_ID,
        SEAL_NUMBERS,
        HORSE_REGISTRATIONS,
        LOT_IDS,
    ];
}

/// Column headers of the flagged bag id report
pub mod flagged_columns {
    pub const ADDED_TIME: &str = "Added Time";
    pub const BAG_ID: &str = "BAG ID";
    pub const SEAL_NUMBER: &str = "KICO SEAL NO.";

    pub const ALL: &[&str] = &[ADDED_TIME, BAG_ID, SEAL_NUMBER];
}

/// Separator used when joining distinct values of a duplicate group
pub const JOIN_SEPARATOR: &str = ", ";

/// Rendering format for date-time cells
pub const DATETIME_RENDER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// PRN Export Schema
// =============================================================================

/// Source column -> PRN target field, in target order
pub const EXPORT_COLUMN_MAPPING: &[(&str, &str)] = &[
    (EFFECTIVE_ID_COLUMN, "name"),
    ("KICO SEAL NO.", "PRN_KICO_SEAL"),
    ("MMS SEAL NO", "MMS_SEAL_NO"),
    (OFFLOAD_DATE_COLUMN, "PRN_RECEIVED_DATE"),
    ("RECORD BAG CONDITION", "PORT_PRN_BAG_CONDITION_STATUS"),
    ("RECEIVING WAREHOUSE", "PRN_WAREHOUSE_NAME"),
    ("RECEIVING HORSE REGISTRATION", "PRN_TRUCK_REG"),
    ("Added Email ID", "WITNESS_PRN_USER"),
    ("Added Time", "PRN_FORM_COMPLETE"),
];

/// Target fields whose values carry the timezone suffix
pub const TIMEZONE_SUFFIX_FIELDS: &[&str] = &["PRN_RECEIVED_DATE", "PRN_FORM_COMPLETE"];

/// Fixed UTC offset annotation appended to date/time export fields
pub const DEFAULT_TIMEZONE_SUFFIX: &str = "+02:00";

// =============================================================================
// Output Files
// =============================================================================

pub const ENRICHED_FILE_NAME: &str = "enriched_records.csv";
pub const DUPLICATES_FILE_NAME: &str = "duplicate_exceptions.csv";
pub const FLAGGED_FILE_NAME: &str = "flagged_bag_ids.csv";

/// Suffix of the time-window export file name
pub const EXPORT_FILE_SUFFIX: &str = "Port_Receiving.csv";

/// Application directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "port-receiving";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// =============================================================================
// Time Window Defaults
// =============================================================================

/// Default start time of day when only a date is given (HH, MM)
pub const DEFAULT_WINDOW_START: (u32, u32) = (0, 0);

/// Default end time of day when only a date is given (HH, MM)
pub const DEFAULT_WINDOW_END: (u32, u32) = (23, 59);
