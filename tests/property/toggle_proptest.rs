//! Property-based tests for like and subscription toggles

use proptest::prelude::*;
use uuid::Uuid;
use vidtube::backend::store::{EntityStore, MemoryStore};
use vidtube::backend::toggle;
use vidtube::shared::models::{LikeTarget, NewUser, NewVideo};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn user(store: &MemoryStore, name: &str) -> Uuid {
    let new_user = NewUser {
        username: name.to_string(),
        email: format!("{}@example.com", name),
        fullname: name.to_string(),
        password_hash: "hash".to_string(),
        avatar: "https://media.test/a.png".to_string(),
        cover_image: String::new(),
    };
    store.create_user(new_user).await.unwrap().id
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_like_present_after_odd_toggles(toggles in 1usize..8) {
        let (present, count) = runtime().block_on(async {
            let store = MemoryStore::new();
            let owner = user(&store, "owner").await;
            let fan = user(&store, "fan").await;
            let video = NewVideo::new("clip", "d", "v".into(), "t".into(), None, owner).unwrap();
            let video_id = store.create_video(video).await.unwrap().id;
            let target = LikeTarget::Video(video_id);

            for _ in 0..toggles {
                toggle::toggle_like(&store, fan, target).await.unwrap();
            }
            let present = store.find_like(fan, target).await.unwrap().is_some();
            let count = store.find_likes_by_user(fan).await.unwrap().len();
            (present, count)
        });

        prop_assert_eq!(present, toggles % 2 == 1);
        prop_assert!(count <= 1);
    }

    #[test]
    fn test_subscription_present_after_odd_toggles(toggles in 1usize..8) {
        let subscribers = runtime().block_on(async {
            let store = MemoryStore::new();
            let channel = user(&store, "channel").await;
            let fan = user(&store, "fan").await;

            for _ in 0..toggles {
                toggle::toggle_subscription(&store, fan, channel).await.unwrap();
            }
            store.find_subscriptions_by_channel(channel).await.unwrap().len()
        });

        prop_assert_eq!(subscribers, toggles % 2);
    }
}
