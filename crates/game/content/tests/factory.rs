use std::fs;

use game_content::{ContentBundle, ContentFactory};
use game_core::{Difficulty, StageKind};

fn write_data_dir(episodes: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("battle.toml"), "special_cost = 3\n").unwrap();
    fs::write(
        dir.path().join("cards.ron"),
        r#"(cards: [
            (id: "luffy", name: "Luffy", health: 100, attack: (min: 10, max: 20), power: 20),
            (id: "koby", name: "Koby", role: Defense, health: 90, attack: (min: 4, max: 9), power: 9),
        ])"#,
    )
    .unwrap();
    fs::write(dir.path().join("episodes.ron"), episodes).unwrap();
    dir
}

#[test]
fn loads_a_data_directory() {
    let dir = write_data_dir(
        r#"(episodes: [(
            number: 1,
            title: "Romance Dawn",
            rewards: (entries: [(kind: Card(card_id: "koby"))]),
            stages: [
                (presentation: (title: "Alvida"), kind: Fight(enemies: [
                    (id: "alvida", name: "Alvida", health: 95, attack: (min: 5, max: 15)),
                ])),
                (presentation: (title: "Escape"), kind: Reward),
            ],
        )])"#,
    );

    let bundle = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(bundle.catalog.cards.len(), 2);
    assert_eq!(bundle.episodes[0].rewards.preview(Difficulty::Easy).count(), 1);
    assert!(matches!(bundle.episodes[0].stages[0].kind, StageKind::Fight { .. }));
}

#[test]
fn dangling_card_reward_is_rejected() {
    let dir = write_data_dir(
        r#"(episodes: [(
            number: 1,
            title: "Romance Dawn",
            rewards: (entries: [(kind: Card(card_id: "zoro"))]),
            stages: [(presentation: (title: "Escape"), kind: Reward)],
        )])"#,
    );

    let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
    assert!(err.to_string().contains("unknown card 'zoro'"));
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ContentFactory::new(dir.path()).load_config().unwrap_err();
    assert!(err.to_string().contains("battle.toml"));
}

#[test]
fn builtin_content_ships_a_timed_reaction() {
    let bundle = ContentBundle::builtin().unwrap();
    let episode = bundle.episodes.iter().find(|e| e.number == 7).unwrap();
    assert!(
        episode
            .stages
            .iter()
            .any(|s| matches!(s.kind, StageKind::TimedReaction(_)))
    );
}
