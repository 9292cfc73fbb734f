pub mod defaults {

    pub const BOOTSTRAP_URL: &str = "https://filmuworker.entertainmentfilmu.workers.dev/";

    pub const PROXY_URL: &str = "https://filmueproxy.vercel.app/m3u8-proxy";

    pub const MIRROR_SITE_URL: &str = "https://iosmirror.cc";

    pub const USER_AGENT: &str = "Mirrarr/1.0";
}

pub mod mirror {

    pub const SEARCH_PATH: &str = "/search.php";

    pub const META_PATH: &str = "/post.php";

    pub const EPISODES_PATH: &str = "/episodes.php";

    pub const PLAYLIST_PATH: &str = "/playlist.php";

    /// First page index requested after the unpaged episode listing.
    pub const FIRST_FOLLOW_UP_PAGE: u32 = 2;

    pub const HASH_COOKIE: &str = "t_hash_t";

    pub const HD_COOKIE: (&str, &str) = ("hd", "on");
}

pub mod stream {

    pub const PRIMARY_STREAM_ID: &str = "primary";

    /// Playlist labels tried in order before falling back to the first entry.
    pub const PREFERRED_LABELS: [&str; 2] = ["Auto", "Full HD"];
}

pub mod progress {

    pub const COMPLETE: u8 = 100;
}
