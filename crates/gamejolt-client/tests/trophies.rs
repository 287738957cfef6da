mod helpers;

use gamejolt_client::{Difficulty, Error, TrophyFilter};
use helpers::*;

fn trophy_block(id: u64, title: &str, difficulty: &str, achieved: &str) -> String {
    format!(
        "\nid:\"{id}\"\ntitle:\"{title}\"\ndifficulty:\"{difficulty}\"\n\
         description:\"About {title}\"\nimage_url:\"http://cdn.example.com/{id}.png\"\n\
         achieved:\"{achieved}\""
    )
}

fn listing() -> String {
    let mut out = String::from(SUCCESS);
    out.push_str(&trophy_block(1, "Opener", "Bronze-ish", "false"));
    out
}

#[test]
fn trophies_require_verification() {
    let mock = MockTransport::new();
    let client = client(&mock);
    assert_eq!(client.all_trophies().unwrap_err(), Error::Unverified);
    assert_eq!(client.trophy(1).unwrap_err(), Error::Unverified);
    assert_eq!(client.achieve_trophy(1).unwrap_err(), Error::Unverified);
    assert!(mock.calls().is_empty());
}

#[test]
fn all_trophies_parses_listing() {
    let mut body = String::from(SUCCESS);
    body.push_str(&trophy_block(1, "Opener", "Easy", "false"));
    body.push_str(&trophy_block(2, "Closer", "HARD", "2 hours ago"));

    let mock = MockTransport::new();
    mock.respond("trophies/", &body);
    let client = verified_client(&mock);

    let trophies = client.all_trophies().unwrap();
    assert_eq!(trophies.len(), 2);
    assert_eq!(trophies[0].id, 1);
    assert_eq!(trophies[0].difficulty, Difficulty::Easy);
    assert!(!trophies[0].is_achieved());
    assert_eq!(trophies[1].title, "Closer");
    assert_eq!(trophies[1].difficulty, Difficulty::Hard);
    assert_eq!(trophies[1].achieved.as_deref(), Some("2 hours ago"));

    let url = mock
        .calls()
        .into_iter()
        .find(|u| u.contains("/trophies/?"))
        .unwrap();
    assert!(url.contains("?game_id=1111&username=username&signature="));
    assert!(url.ends_with("&user_token=userToken"));
}

#[test]
fn filters_add_achieved_param() {
    let mock = MockTransport::new();
    mock.respond("trophies/", SUCCESS);
    let client = verified_client(&mock);

    assert!(client.achieved_trophies().unwrap().is_empty());
    assert!(client.unachieved_trophies().unwrap().is_empty());
    assert!(client.trophies(TrophyFilter::All).unwrap().is_empty());

    let calls: Vec<_> = mock
        .calls()
        .into_iter()
        .filter(|u| u.contains("/trophies/?"))
        .collect();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].contains("&achieved=true&"));
    assert!(calls[1].contains("&achieved=false&"));
    assert!(!calls[2].contains("achieved="));
}

#[test]
fn single_trophy_lookup() {
    let mut body = String::from(SUCCESS);
    body.push_str(&trophy_block(42, "Answer", "Medium", "false"));

    let mock = MockTransport::new();
    mock.respond_when("trophies/", "trophy_id=42", &body);
    mock.respond_when("trophies/", "trophy_id=7", FAILURE);
    let client = verified_client(&mock);

    let found = client.trophy(42).unwrap().expect("trophy 42");
    assert_eq!(found.title, "Answer");
    assert_eq!(found.image_url.as_str(), "http://cdn.example.com/42.png");
    assert!(client.trophy(7).unwrap().is_none());
}

#[test]
fn bad_difficulty_is_malformed() {
    let mock = MockTransport::new();
    mock.respond("trophies/", &listing());
    let client = verified_client(&mock);
    assert!(matches!(client.all_trophies(), Err(Error::Malformed(_))));
}

#[test]
fn achieve_trophy_reports_success_flag() {
    let mock = MockTransport::new();
    mock.respond_when("trophies/add-achieved/", "trophy_id=1&", SUCCESS);
    mock.respond_when("trophies/add-achieved/", "trophy_id=2&", FAILURE);
    let client = verified_client(&mock);

    assert!(client.achieve_trophy(1).unwrap());
    assert!(!client.achieve_trophy(2).unwrap());
    assert_eq!(mock.calls_to("trophies/add-achieved/"), 2);
}
