// Reply copy rendered by the desk

use super::constants::REACTIONS;
use rand::seq::SliceRandom;

pub const GO_FOR_IT: &str = "Go for it!";
pub const UP_AFTER_CURRENT: &str = "Alrighty, you're up after the current deployer.";
pub const NOT_IN_QUEUE: &str =
    "Ummm, this is a little embarrassing, but you aren't in the queue :grimacing:";
pub const NOT_YOUR_TURN: &str = "Nice try, but it's not your turn yet";
pub const NICE_JOB: &str = "Nice job! :tada:";
pub const NOBODY: &str = "Nobody!";
pub const YOU_ARE_DEPLOYING: &str = "It's you. _You're_ deploying. Right now.";
pub const YOU_ARE_NEXT: &str = "You're up next!";
pub const NOT_EVEN_QUEUED: &str = "No sweat! You weren't even in the queue :)";
pub const TOOK_YOU_OUT: &str = "Alright, I took you out of the queue. Come back soon!";
pub const PONG: &str = "deploy pong";
pub const REPLY_PONG: &str = "deploy reply pong";

/// Direct message to the holder who just got the turn
pub const YOUR_TURN: &str = "Hey, it's your turn to deploy!";
/// Direct message sent when the idle timer expires
pub const STILL_DEPLOYING: &str = "Are you still deploying?";

pub fn deploying_in_a_row(count: usize) -> String {
    format!("Ok! You are now deploying {count} things in a row.")
}

pub fn ahead_of_you(count: usize) -> String {
    format!(
        "There's {count} things to deploy in the queue ahead of you. I'll let you know when you're up."
    )
}

pub fn more_to_go(count: usize) -> String {
    format!("Nice! Only {count} more to go! {}", random_reaction())
}

/// "<name> is deploying" followed by what, or how many items
pub fn is_deploying(name: &str, metadata: &str, run_length: usize) -> String {
    if run_length > 1 {
        format!("{name} is deploying {run_length} items.")
    } else if metadata.is_empty() {
        format!("{name} is deploying.")
    } else {
        format!("{name} is deploying {metadata}")
    }
}

pub fn is_next(name: &str) -> String {
    format!("{name} is next.")
}

pub fn not_queued(name: &str) -> String {
    format!("{name} isn't in the queue :)")
}

pub fn removed(name: &str) -> String {
    format!("{name} has been removed from the queue. I hope that's what you meant to do...")
}

pub fn queue_listing(names: &[String]) -> String {
    format!("Here's who's in the queue: {}.", names.join(", "))
}

pub fn help(prefix: &str) -> String {
    [
        format!("`{prefix} add _metadata_`: Add yourself to the deploy queue. I'll give you a heads up when it's your turn. Anything after `add` will be included in messages about what you're deploying. Something like `{prefix} add my_api`."),
        format!("`{prefix} done`: Say this when you're done and then I'll tell the next person. Or you could say `{prefix} complete`."),
        format!("`{prefix} remove _user_`: Removes a user completely from the queue. Use `remove me` to remove yourself. Also works with `{prefix} kick _user_`."),
        format!("`{prefix} current`: Who's deploying right now. Also works with `{prefix} who's deploying`."),
        format!("`{prefix} next`: Sneak peek at the next person in line. Also works with `{prefix} who's next`."),
        format!("`{prefix} list`: Lists the queue."),
        format!("`{prefix} debug`: Kinda like `{prefix} list`."),
    ]
    .join("\n")
}

fn random_reaction() -> &'static str {
    REACTIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(":rocket:")
}
