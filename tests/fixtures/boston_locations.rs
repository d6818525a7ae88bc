//! Real Boston locations for realistic test fixtures.
//!
//! Coordinates are actual places around central Boston, close enough
//! together that every transport mode can cover them in a day.

use itinerary_planner::Location;

/// The traveler's hotel: depot with no visit duration, window spanning an
/// 8:00-22:00 waking day.
pub fn marriott_depot() -> Location {
    Location::new(
        "HOTEL",
        "Marriott Cambridge",
        42.3629114,
        -71.0861978,
        480,
        1320,
        0,
    )
}

/// Must-see attractions, open 9:00-17:00, an hour each.
pub fn required_attractions() -> Vec<Location> {
    vec![
        Location::new(
            "mass-hall",
            "Massachusetts Hall",
            42.3744368,
            -71.1182810,
            540,
            1020,
            60,
        ),
        Location::new(
            "fenway",
            "Fenway Park",
            42.3466764,
            -71.0972178,
            540,
            1020,
            60,
        ),
        Location::new(
            "churchill",
            "Churchill Hall",
            42.3387904,
            -71.0888920,
            420,
            1140,
            60,
        ),
        Location::new(
            "chinatown",
            "Chinatown",
            42.3493259,
            -71.0621815,
            540,
            1020,
            60,
        ),
    ]
}

/// Optional pool, most preferred first.
pub fn optional_attractions() -> Vec<Location> {
    vec![
        Location::new(
            "common",
            "Boston Common",
            42.3550, -71.0656, 480, 1320, 60,
        ),
        Location::new(
            "quincy",
            "Quincy Market",
            42.3600, -71.0545, 600, 1260, 60,
        ),
        Location::new(
            "mfa",
            "Museum of Fine Arts",
            42.3394, -71.0940, 600, 1020, 60,
        ),
        Location::new(
            "aquarium",
            "New England Aquarium",
            42.3592, -71.0499, 540, 1020, 60,
        ),
        Location::new(
            "bunker-hill",
            "Bunker Hill Monument",
            42.3763, -71.0607, 540, 1020, 60,
        ),
    ]
}
