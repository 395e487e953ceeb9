/// Hampton Roads localities: `(name, latitude, longitude)`
///
/// Order matters: the first name found in a text wins.
pub const LOCALITIES: &[(&str, f64, f64)] = &[
    ("Norfolk", 36.8508, -76.2859),
    ("Virginia Beach", 36.8529, -75.9780),
    ("Chesapeake", 36.7682, -76.2875),
    ("Hampton", 37.0299, -76.3452),
    ("Newport News", 37.0871, -76.4730),
    ("Portsmouth", 36.8354, -76.2983),
    ("Suffolk", 36.7282, -76.5836),
    ("Williamsburg", 37.2707, -76.7075),
    ("Poquoson", 37.1224, -76.3458),
    ("Yorktown", 37.2390, -76.5090),
    ("Gloucester", 37.4075, -76.5191),
    ("Smithfield", 36.9824, -76.6313),
    ("Isle of Wight", 36.9087, -76.7054),
    ("James City County", 37.3304, -76.7662),
    ("York County", 37.2374, -76.5146),
];

/// ZIP codes served by the localities above
pub const ZIP_CODES: &[&str] = &[
    // Norfolk
    "23501", "23502", "23503", "23504", "23505", "23506", "23507", "23508", "23509", "23510",
    "23511", "23513", "23517", "23518", "23519", "23523", "23551",
    // Virginia Beach
    "23450", "23451", "23452", "23453", "23454", "23455", "23456", "23457", "23459", "23460",
    "23461", "23462", "23463", "23464", "23465", "23466", "23467", "23471",
    // Chesapeake
    "23320", "23321", "23322", "23323", "23324", "23325", "23326", "23327", "23328",
    // Hampton
    "23630", "23651", "23661", "23663", "23664", "23665", "23666", "23667", "23668", "23669",
    // Newport News
    "23601", "23602", "23603", "23604", "23605", "23606", "23607", "23608", "23609", "23612",
    // Portsmouth
    "23701", "23702", "23703", "23704", "23705", "23707", "23708", "23709",
    // Suffolk
    "23432", "23433", "23434", "23435", "23436", "23437", "23438", "23439",
    // Williamsburg
    "23185", "23186", "23187", "23188",
];
