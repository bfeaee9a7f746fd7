mod player_thread;
mod server_thread;

pub use player_thread::*;
pub use server_thread::*;
