use super::history::{reorganize, MAX_MESSAGES_PER_ROLE};
use super::Conversation;
use crate::api::FragmentStream;
use crate::error::Result;
use crate::models::Message;
use futures::{Stream, StreamExt};
use std::ops::DerefMut;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Lazy sequence of assistant text fragments for one streaming turn.
///
/// The fragments are accumulated while they pass through. When the
/// underlying completion stream ends, the accumulated text is appended to the
/// conversation as a single assistant message and the history bound is
/// applied. That happens exactly once; afterwards the stream only yields
/// `None`. Dropping the stream early, or hitting an error, leaves the
/// conversation without the assistant turn.
///
/// `G` is anything that hands out the conversation mutably: a plain
/// `&mut Conversation` or an owned mutex guard.
pub struct ConversationStream<G> {
    conversation: G,
    fragments: FragmentStream,
    content: String,
    finished: bool,
}

impl<G> ConversationStream<G>
where
    G: DerefMut<Target = Conversation> + Unpin,
{
    pub(super) fn new(conversation: G, fragments: FragmentStream) -> Self {
        Self {
            conversation,
            fragments,
            content: String::new(),
            finished: false,
        }
    }

    /// Whether the stream has ended, successfully or not
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Give back the conversation handle
    pub fn into_inner(self) -> G {
        self.conversation
    }

    fn finalize(&mut self) {
        let content = std::mem::take(&mut self.content);
        let conversation = self.conversation.deref_mut();
        conversation.messages.push(Message::assistant(content));
        reorganize(&mut conversation.messages, MAX_MESSAGES_PER_ROLE);
        self.finished = true;
    }
}

impl<G> Stream for ConversationStream<G>
where
    G: DerefMut<Target = Conversation> + Unpin,
{
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        match this.fragments.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(fragment))) => {
                this.content.push_str(&fragment);
                Poll::Ready(Some(Ok(fragment)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.finalize();
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
