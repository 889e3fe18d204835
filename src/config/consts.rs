// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = "Mozilla/5.0";
pub const CONNECT_TIMEOUT_SECS: u64 = 15;
pub const READ_TIMEOUT_SECS: u64 = 30;

// Sites
pub const WFTDA_URL: &str = "https://resources.wftda.org/officiating/roller-derby-certification-program-for-officials/roster-of-certified-officials/";
pub const DRC_URL: &str = "http://www.derbyrollcall.com/everyone";
pub const RDR_URL: &str = "https://rollerderbyroster.com/view-names/?ini=";
pub const RDN_SITEMAP_URL: &str = "https://rdnation.com/sitemap.xml";
pub const TWOEVILS_URL: &str = "https://twoevils.org/rollergirls/";

// Output
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const OUTPUT_DIR_ENV: &str = "DERBY_NAMES_DATA";
pub const STAGING_PREFIX: &str = ".staging-";

// Artifacts
pub const WFTDA_CSV: &str = "wftda.csv";
pub const DRC_CSV: &str = "derbyrollcall.csv";
pub const RDR_CSV: &str = "rollerderbyroster.csv";
pub const RDN_CSV: &str = "rdnation.csv";
pub const TWOEVILS_CSV: &str = "twoevils.csv";
pub const COMBINED_CSV: &str = "derby_names.csv";
pub const NAMES_TXT: &str = "derby_names.txt";
pub const NAMES_ASCII_TXT: &str = "derby_names_ascii.txt";
pub const NUMBERS_TXT: &str = "derby_numbers.txt";
pub const NAMES_NUMBERS_TSV: &str = "derby_names_numbers.tsv";

// Columns
pub const COL_NAME: &str = "Name";
pub const COL_NUMBER: &str = "Number";
pub const COL_URL: &str = "url";
pub const COL_REGISTERED: &str = "Registered";

// Scrape
pub const DEFAULT_RDR_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const RDN_LEAGUE_MARKER: &str = "roller-derby-league/";
pub const RDN_MAX_SITEMAP_DEPTH: usize = 3;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
