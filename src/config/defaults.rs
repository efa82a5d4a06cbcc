/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Feed defaults
pub const DEFAULT_TIMEZONE: &str = "Asia/Manila";
pub const DEFAULT_TIMEZONE_LABEL: &str = "PHT";
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 2;
pub const MAX_LOOKAHEAD_DAYS: u32 = 31;
pub const DEFAULT_EVENT_DURATION: &str = "4h";
pub const DEFAULT_SKIPPED_CATEGORY_MARKERS: &[&str] = &["24/7"];

// Playlist defaults
pub const DEFAULT_OUTPUT_PATH: &str = "SportsWebcast.m3u8";
pub const DEFAULT_PLAYLIST_HEADER: &str =
    r#"#EXTM3U url-tvg="https://epgshare01.online/epgshare01/epg_ripper_DUMMY_CHANNELS.xml.gz""#;
pub const DEFAULT_ENDED_GROUP: &str = "Ended Games";
pub const DEFAULT_UNAVAILABLE_URL: &str = "https://example.com/stream_unavailable.m3u8";
pub const DEFAULT_NO_STREAM_PREFIX: &str = "❌ NO STREAM - ";
pub const DEFAULT_REWRITE_INDEX_PLAYLISTS: bool = true;
pub const DEFAULT_VLC_OPTIONS: &[&str] = &[
    "#EXTVLCOPT:http-origin=https://ppv.to",
    "#EXTVLCOPT:http-referrer=https://ppv.to/",
    "#EXTVLCOPT:http-user-agent=Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:143.0) Gecko/20100101 Firefox/143.0",
];

// Normalizer defaults
pub const DEFAULT_STATUS_GLYPHS: &[&str] = &["🟢", "🔴", "❌"];
pub const DEFAULT_LEGACY_PREFIXES: &[&str] = &["live", "ended", "no stream"];

// Schedule defaults
pub const DEFAULT_CRON: &str = "0 */10 * * * *";
pub const DEFAULT_RUN_ON_START: bool = true;

// Catalog defaults
pub const DEFAULT_TVG_ID: &str = "Misc.Dummy.us";
pub const DEFAULT_FALLBACK_GROUP_PREFIX: &str = "PPVLand - ";
pub const DEFAULT_UNKNOWN_CATEGORY: &str = "Misc";

const LOGO_BASE: &str = "http://drewlive24.duckdns.org:9000/Logos";

pub fn default_category_logos() -> Vec<(&'static str, String)> {
    vec![
        ("Wrestling", format!("{LOGO_BASE}/Wrestling.png")),
        ("Football", format!("{LOGO_BASE}/Football.png")),
        ("Basketball", format!("{LOGO_BASE}/NCAA.png")),
        ("Baseball", format!("{LOGO_BASE}/Baseball.png")),
        ("American Football", format!("{LOGO_BASE}/NFL3.png")),
        ("Combat Sports", format!("{LOGO_BASE}/CombatSports2.png")),
        ("Darts", format!("{LOGO_BASE}/Darts.png")),
        ("Motorsports", format!("{LOGO_BASE}/Motorsports2.png")),
        ("Ice Hockey", format!("{LOGO_BASE}/Hockey.png")),
        ("NBA", format!("{LOGO_BASE}/NBA.png")),
        ("NCAA", format!("{LOGO_BASE}/NCAA.png")),
        ("Cricket", "https://i.imgur.com/rA9TeSu.png".to_string()),
    ]
}

pub const DEFAULT_CATEGORY_TVG_IDS: &[(&str, &str)] = &[
    ("Wrestling", "PPV.EVENTS.Dummy.us"),
    ("Football", "Soccer.Dummy.us"),
    ("Basketball", "NCAA.Basketball.Dummy.us"),
    ("NBA", "NBA.Basketball.Dummy.us"),
    ("NCAA", "NCAA.Basketball.Dummy.us"),
    ("Baseball", "MLB.Baseball.Dummy.us"),
    ("American Football", "NFL.Dummy.us"),
    ("College Football", "NCAA.Football.Dummy.us"),
    ("Combat Sports", "PPV.EVENTS.Dummy.us"),
    ("Darts", "Darts.Dummy.us"),
    ("Motorsports", "Racing.Dummy.us"),
    ("Ice Hockey", "NHL.Hockey.Dummy.us"),
    ("Cricket", "Cricket.Dummy.us"),
];

pub const DEFAULT_CATEGORY_GROUPS: &[(&str, &str)] = &[
    ("Wrestling", "Wrestling Events"),
    ("Football", "Global Football Streams"),
    ("Basketball", "NCAA College Basketball"),
    ("NBA", "NBA Games"),
    ("NCAA", "NCAA College Basketball"),
    ("Baseball", "MLB"),
    ("American Football", "NFL Action"),
    ("College Football", "NCAA College Football"),
    ("Combat Sports", "Combat Sports"),
    ("Darts", "Darts"),
    ("Motorsports", "Racing Action"),
    ("Ice Hockey", "NHL Action"),
    ("Cricket", "Cricket Games"),
];

pub const DEFAULT_NBA_TEAMS: &[&str] = &[
    "hawks", "celtics", "nets", "hornets", "bulls", "cavaliers", "mavericks", "nuggets",
    "pistons", "warriors", "rockets", "pacers", "clippers", "lakers", "grizzlies", "heat",
    "bucks", "timberwolves", "pelicans", "knicks", "thunder", "magic", "sixers", "suns",
    "blazers", "kings", "spurs", "raptors", "jazz", "wizards",
];

pub const DEFAULT_NCAA_KEYWORDS: &[&str] = &[
    "wildcats", "falcons", "zips", "crimson tide", "bulldogs", "hornets", "great danes",
    "braves", "eagles", "mountaineers", "sun devils", "razorbacks", "golden lions",
    "red wolves", "black knights", "tigers", "governors", "cardinals", "bears", "bruins",
    "cougars", "bearcats", "broncos", "terriers", "bison", "bulls", "dawgs", "lions",
    "huskies", "matadors", "titans", "gauchos", "golden bears", "camels", "golden griffins",
    "mocs", "panthers", "spiders", "rams", "buffaloes", "big red", "bluejays", "big green",
    "flyers", "blue hens", "pioneers", "blue demons", "dragons", "blue devils", "dukes",
    "pirates", "bucs", "vikings", "raiders", "red raiders", "gators", "seminoles", "paladins",
    "runnin bulldogs", "patriots", "colonials", "hoyas", "yellow jackets", "lopes", "crimson",
    "warriors", "phoenix", "crusaders", "vandals", "bengals", "fighting illini", "redbirds",
    "flames", "hoosiers", "sycamores", "gaels", "hawkeyes", "cyclones", "mastodons", "jaguars",
    "dolphins", "gamecocks", "jayhawks", "owls", "golden flashes", "explorers", "leopards",
    "mountain hawks", "bisons", "trojans", "beach", "sharks", "lancers", "ragin cajuns",
    "warhawks", "ramblers", "greyhounds", "black bears", "jaspers", "red foxes",
    "thundering herd", "terps", "hawks", "minutemen", "river hawks", "cowboys", "hurricanes",
    "redhawks", "wolverines", "spartans", "golden gophers", "rebels", "kangaroos", "grizzlies",
    "bobcats", "blue knights", "brown bears", "jackrabbits", "mavericks", "broncs", "vaqueros",
    "scarlet knights", "billikens", "peacocks", "bearkats", "toreros", "aztecs", "dons",
    "saints", "siue cougars", "mustangs", "cocks", "coyotes", "screaming eagles", "knights",
    "seahawks", "mercer bears", "blue hoses", "hoos", "highlanders", "tillicums", "cavaliers",
    "hokies", "keydets", "demon deacons", "dutchmen", "hilltoppers", "shockers", "tribe",
    "badgers", "musketeers", "penguins",
];
