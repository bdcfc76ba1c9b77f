//! Built-in seed data, persisted exactly once when a fresh storage
//! directory is first accessed.

use shared::{MeterReading, Resident};

/// The fixed resident list used to bootstrap a fresh installation.
pub(crate) fn default_residents() -> Vec<Resident> {
    [
        ("1", "B1", "P. Pras"),
        ("2", "B2", "P. Richard"),
        ("3", "B3", "P. Farid"),
        ("4", "B5", "P. Yoyok"),
        ("5", "B7", "P. Hendra"),
        ("6", "B8", "P. Agus"),
        ("7", "B9", "P. Rizky"),
        ("8", "B10", "P. Junaidi"),
        ("9", "B11", "P. Hendrawan"),
        ("10", "B12", "P. Daud"),
        ("11", "B14", "P. Joko"),
        ("12", "B15", "P. Dedi"),
        ("13", "B16", "P. Bendra"),
        ("14", "B17", "P. Andik"),
        ("15", "B20", "P. Wito"),
        ("16", "B21", "P. Endro"),
        ("17", "B22", "P. Andre"),
        ("18", "B23", "P. Robby"),
        ("19", "B24", "P. Gita"),
        ("20", "B25", "P. Andri"),
        ("21", "B26", "P. Sunari"),
        ("22", "B28", "P. Eko"),
    ]
    .into_iter()
    .map(|(id, house_number, name)| Resident {
        id: id.to_string(),
        house_number: house_number.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Historical demo readings for a handful of residents. The gaps are
/// deliberate: some months were never recorded, one resident has a meter
/// reset, and one chain crosses a year boundary.
pub(crate) fn historical_readings() -> Vec<MeterReading> {
    [
        // Resident 1: continuous chain across the 2024 -> 2025 boundary
        ("seed::1", "1", 8, 2024, 120.0),
        ("seed::2", "1", 9, 2024, 128.5),
        ("seed::3", "1", 10, 2024, 135.0),
        ("seed::4", "1", 11, 2024, 142.25),
        ("seed::5", "1", 0, 2025, 150.75),
        // Resident 2: October never recorded, so November has no baseline
        ("seed::6", "2", 9, 2024, 210.0),
        ("seed::7", "2", 11, 2024, 225.0),
        // Resident 3: a genuine zero-usage month
        ("seed::8", "3", 10, 2024, 55.0),
        ("seed::9", "3", 11, 2024, 61.5),
        ("seed::10", "3", 0, 2025, 61.5),
        // Resident 4: single reading, never any baseline
        ("seed::11", "4", 11, 2024, 305.0),
        // Resident 5: meter replaced between months, indicator went backwards
        ("seed::12", "5", 11, 2024, 92.0),
        ("seed::13", "5", 0, 2025, 90.5),
    ]
    .into_iter()
    .map(|(id, resident_id, month, year, value)| MeterReading {
        id: id.to_string(),
        resident_id: resident_id.to_string(),
        month,
        year,
        value,
    })
    .collect()
}
