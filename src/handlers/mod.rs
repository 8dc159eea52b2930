pub mod rest;

pub use rest::{
    create_game_handler, delete_game_handler, get_game_handler, high_scores_handler,
    list_sessions_handler, move_handler,
};
