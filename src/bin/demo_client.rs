use board_arcade::game::ScoreEntry;
use serde::Deserialize;
use serde_json::{json, Value};

// --- Re-definitions of DTOs ---
// Only the fields the client reads.

#[derive(Debug, Deserialize)]
struct CreatedSession {
    session_id: String,
    #[serde(default)]
    target: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize)]
struct MoveReply {
    outcome: Value,
}

#[derive(Debug, Deserialize)]
struct HighScoresResponse {
    scores: Vec<ScoreEntry>,
}

async fn play(
    client: &reqwest::Client,
    base_url: &str,
    game: &str,
    session_id: &str,
    body: Value,
) -> Result<MoveReply, Box<dyn std::error::Error>> {
    let reply = client
        .post(format!("{}/games/{}/sessions/{}/moves", base_url, game, session_id))
        .json(&body)
        .send()
        .await?
        .json::<MoveReply>()
        .await?;
    Ok(reply)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let base_url = "http://127.0.0.1:3000";

    println!("--- BOARD ARCADE DEMO CLIENT ---");

    println!("\n[1] Creating Connect Four game...");
    let connect_four = client
        .post(format!("{}/games/connect-four", base_url))
        .json(&json!({ "game_id": 1, "user_id": "host", "opponent_id": "guest" }))
        .send()
        .await?
        .json::<CreatedSession>()
        .await?;
    println!("Success! Session ID: {}", connect_four.session_id);

    println!("\n[2] Playing a vertical win in column 1...");
    for _ in 0..3 {
        for (player, column) in [("host", 1), ("guest", 2)] {
            let reply = play(
                &client,
                base_url,
                "connect-four",
                &connect_four.session_id,
                json!({ "player_num": player, "column": column }),
            )
            .await?;
            println!("....[{player}] column {column}: {}", reply.outcome);
        }
    }
    let reply = play(
        &client,
        base_url,
        "connect-four",
        &connect_four.session_id,
        json!({ "player_num": "host", "column": 1 }),
    )
    .await?;
    println!("....[host] column 1: {}", reply.outcome);

    println!("\n[3] Creating Mastermind game...");
    let mastermind = client
        .post(format!("{}/games/mastermind", base_url))
        .json(&json!({ "game_id": 0, "user_id": "host" }))
        .send()
        .await?
        .json::<CreatedSession>()
        .await?;
    println!("Success! Session ID: {}", mastermind.session_id);

    let mut guesses = vec![json!([1, 2, 3, 4]), json!([5, 6, 7, 8])];
    if let Some(target) = mastermind.target {
        guesses.push(json!(target));
    }
    for guess in guesses {
        let reply = play(
            &client,
            base_url,
            "mastermind",
            &mastermind.session_id,
            json!({ "guess": guess }),
        )
        .await?;
        println!("....guess {guess}: {}", reply.outcome);
    }

    println!("\n[4] High scores...");
    for game in ["connect-four", "mastermind"] {
        let response = client
            .get(format!("{}/games/{}/highscores", base_url, game))
            .send()
            .await?
            .json::<HighScoresResponse>()
            .await?;
        let ranked: Vec<String> = response
            .scores
            .iter()
            .filter_map(|entry| entry.moves.map(|moves| format!("{moves} ({})", entry.label)))
            .collect();
        println!("{game}: {}", ranked.join(", "));
    }

    Ok(())
}
