//! Name pools for synthetic clients
//!
//! Order matters: the generator indexes into these lists with seeded draws,
//! so reordering them changes every generated roster.

pub const FIRST_NAMES: [&str; 20] = [
    "Alex", "Jordan", "Taylor", "Morgan", "Riley", "Casey", "Cameron", "Dakota", "Jesse", "Quinn",
    "Peyton", "Avery", "Reese", "Rowan", "Sydney", "Shawn", "Logan", "Skyler", "Blake", "Jamie",
];

pub const LAST_NAMES: [&str; 20] = [
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Miller",
    "Davis",
    "Garcia",
    "Rodriguez",
    "Wilson",
    "Martinez",
    "Anderson",
    "Taylor",
    "Thomas",
    "Hernandez",
    "Moore",
    "Martin",
    "Jackson",
    "Thompson",
    "White",
];
