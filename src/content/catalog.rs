use super::{ContentItem, ContentSnapshot, Creator, Platform, WatchEntry};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CREATOR_NAMES: &[&str] = &[
    "Ada Streams",
    "Pixel Harbor",
    "The Long Read",
    "Circuit Café",
    "Night Shift Radio",
    "Field Notes",
    "Speedrun Sal",
    "Quiet Kitchen",
];

const CREATOR_COUNT: usize = 8;
const ITEMS_PER_CREATOR: usize = 6;
const HISTORY_LEN: usize = 10;

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build a mock catalog. The same seed always produces the same creators,
/// items and history; timestamps are relative to `now`.
pub fn generate(seed: u64, now: DateTime<Utc>) -> ContentSnapshot {
    let mut rng = StdRng::seed_from_u64(seed);

    let creators: Vec<Creator> = (0..CREATOR_COUNT)
        .map(|i| Creator {
            id: format!("creator-{i}"),
            name: CREATOR_NAMES[i % CREATOR_NAMES.len()].to_string(),
            platform: Platform::ALL[i % Platform::ALL.len()],
            followed: i % 4 != 3,
        })
        .collect();

    let mut items = Vec::with_capacity(CREATOR_COUNT * ITEMS_PER_CREATOR);
    for creator in &creators {
        for n in 0..ITEMS_PER_CREATOR {
            let title_words = rng.gen_range(3..7);
            let title = capitalize(&lipsum::lipsum_words_with_rng(&mut rng, title_words));
            let summary = lipsum::lipsum_words_with_rng(&mut rng, 18);
            let hours_ago = rng.gen_range(1..24 * 21);
            let duration_minutes = match creator.platform {
                Platform::Twitch => rng.gen_range(60..240),
                Platform::Podcast => rng.gen_range(25..95),
                Platform::Blog => rng.gen_range(3..15),
                Platform::YouTube => rng.gen_range(5..40),
            };
            items.push(ContentItem {
                id: format!("{}-item-{n}", creator.id),
                title: title.trim_end_matches('.').to_string(),
                summary,
                creator_id: creator.id.clone(),
                creator_name: creator.name.clone(),
                platform: creator.platform,
                published_at: now - Duration::hours(hours_ago),
                duration_minutes,
                views: rng.gen_range(200..2_500_000),
            });
        }
    }

    let mut feed: Vec<ContentItem> = items
        .iter()
        .filter(|item| {
            creators
                .iter()
                .any(|c| c.followed && c.id == item.creator_id)
        })
        .cloned()
        .collect();
    feed.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let mut trending = items;
    trending.sort_by(|a, b| b.views.cmp(&a.views));

    let mut watch_history: Vec<WatchEntry> = Vec::with_capacity(HISTORY_LEN);
    while watch_history.len() < HISTORY_LEN.min(trending.len()) {
        let item = &trending[rng.gen_range(0..trending.len())];
        if watch_history.iter().any(|e| e.item_id == item.id) {
            continue;
        }
        let finished = rng.gen_bool(0.3);
        watch_history.push(WatchEntry {
            item_id: item.id.clone(),
            progress: if finished { 1.0 } else { rng.gen_range(0.05..0.95) },
            last_watched: now - Duration::minutes(rng.gen_range(5..60 * 24 * 7)),
        });
    }
    watch_history.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));

    ContentSnapshot {
        creators,
        feed,
        trending,
        watch_history,
    }
}
