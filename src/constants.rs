pub mod cache {

    pub const FRESHNESS_WINDOW_MINUTES: i64 = 60;
}

pub mod catalog {
    use std::time::Duration;

    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub const USER_AGENT: &str = "Podarr/1.0";

    pub const DEFAULT_BASE_URL: &str = "https://itunes.apple.com/search";
}

pub mod limits {

    pub const MAX_TERM_LENGTH: usize = 100;

    pub const MIN_RESULT_LIMIT: u32 = 1;

    pub const MAX_RESULT_LIMIT: u32 = 200;

    pub const DEFAULT_RESULT_LIMIT: u32 = 20;
}

pub mod popular {

    /// Rotating seed terms for the curated Arabic podcast listing.
    pub const ARABIC_TERMS: &[&str] = &[
        "ثمانية",
        "فنجان",
        "تبن",
        "بودكاست عربي",
        "أبجورة",
        "دكان",
        "ملفات",
        "نصائح",
        "صوت",
        "حكايا",
        "قصص",
        "أدب",
        "تاريخ",
        "تقنية",
        "علوم",
        "ثقافة",
        "مقابلة",
    ];

    pub const TERMS_PER_ROTATION: usize = 3;
}

pub mod artwork {

    pub const PLACEHOLDER: &str = "/placeholder-podcast.png";
}
