//! Starter data for a fresh install

use chrono::Utc;

use crate::catalog::Catalog;
use crate::models::{Book, Profile};

/// Profile name used until the reader picks one
pub const DEFAULT_USER_NAME: &str = "Avid Reader";

const CIRCE_COVER: &str = "https://lh3.googleusercontent.com/aida-public/AB6AXuBpCEY8WwYbcuT7hPTIds7a26gm5XTARkmmGmk6Qo0y545NMlPEDjbA9SlJwreTOOPlEmTORFsbDmKahbYQsNuzF4RFU_tGu8_1-4KHoSH5bgCVyYOxQ7QKJqxk9squKz2UXuND-g4kvA3Bks2fuJsl37DjZqqNxJkt5T-oYcQPbdOq5sG864gTczIDzMwSDx2uxryGOBXFVnobxdFZqxR2QJDRa5w_sYjNK0WUXMxOgexmWm_Wu8FCFNo-BkJG1ooJUJfGyCnP-7g";
const ATOMIC_HABITS_COVER: &str = "https://lh3.googleusercontent.com/aida-public/AB6AXuBaw3Q3fFsqo7bHRKozaYIhdJFpF7d0n6IEWCMTpFST-9uTpmhZ4OtGCuMN-wAJFDr3xpZY3BUhPuLOIoOZWHCvKElUW1QVFJTgA9tAAS1yzdGu7q1Dq1NqvTw7ovdk6A2OQcvF_528xNtQ_h52FaHCDoxCSldbFJQNjvJ7PsY1iLFOSasR1g_jtyt1C0RBHNrav_G-eUBkGKp7GbrMAQJP8iHSVJlMrKm5e7SRScmadK2Bi82v2Fx-QOiG-nAv7gVGk2Z51trZgIk";
const KLARA_COVER: &str = "https://lh3.googleusercontent.com/aida-public/AB6AXuBrLPGUA-8KMGKU-eFjZiwNKYYnEK1F7FE8UJJsMSvNRXLTDK4FZ4qBTDEDM3oOgB9EzDgptvWn9txVrOlWMW9mMKMkVwu7HR1fntV9bMQ4qi2DBXbpnogFjsp4-vMyM_yQ18NvW4kfe7NNHczExrKGo7gJ3NvGNDHRaEdsJTOD9mHOYo908bQARtrGIWkQ1Fn399JHjNBkSBLLcYR1ORnd310AM_Yuab4U-ViP49CrmrLTKJdht5ddK4FxDuHKaBOnvDMCVNSmMA8";

/// The default profile
pub fn default_profile() -> Profile {
    Profile::new(DEFAULT_USER_NAME)
}

/// The catalog shown before the reader has saved anything
pub fn default_catalog() -> Catalog {
    let now = Utc::now().timestamp_millis();
    let books = vec![
        seed_book(
            "1",
            "Circe",
            "Madeline Miller",
            CIRCE_COVER,
            "A bold and subversive retelling of the goddess Circe's life, weaving together myth and humanity.",
            true,
            now - 1_000_000,
        ),
        seed_book(
            "2",
            "Atomic Habits",
            "James Clear",
            ATOMIC_HABITS_COVER,
            "A practical guide to breaking bad habits and building good ones through small, incremental changes.",
            false,
            now - 500_000,
        ),
        seed_book(
            "3",
            "Klara and the Sun",
            "Kazuo Ishiguro",
            KLARA_COVER,
            "Through the eyes of an \"Artificial Friend\", Ishiguro explores what it means to love and be human.",
            false,
            now - 200_000,
        ),
    ];

    // ids above are distinct
    Catalog::from_books(books).unwrap_or_default()
}

fn seed_book(
    id: &str,
    title: &str,
    author: &str,
    cover_url: &str,
    summary: &str,
    is_read: bool,
    added_at: i64,
) -> Book {
    Book {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        cover_url: cover_url.to_string(),
        summary: summary.to_string(),
        is_read,
        progress: None,
        total_pages: None,
        read_pages: None,
        added_at,
    }
}
