use crate::models::{Message, Role};
use std::collections::HashMap;

/// Most recent messages kept per role after every completed turn
pub const MAX_MESSAGES_PER_ROLE: usize = 10;

/// Bound the history so that no role keeps more than `limit` messages.
///
/// The oldest messages of an over-limit role are dropped first; survivors keep
/// their chronological order.
pub fn reorganize(messages: &mut Vec<Message>, limit: usize) {
    let mut excess: HashMap<Role, usize> = HashMap::new();
    for message in messages.iter() {
        *excess.entry(message.role).or_insert(0) += 1;
    }
    for count in excess.values_mut() {
        *count = count.saturating_sub(limit);
    }

    messages.retain(|message| match excess.get_mut(&message.role) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            false
        }
        _ => true,
    });
}
