//! Feed service orchestrating commands across user and post aggregates.

use std::sync::Arc;

use common::{AggregateCategory, AggregateId, PostId, UserId};
use event_store::{AppendOptions, EventBus, EventStore, MetricsSubscriber, TracingSubscriber};

use crate::aggregate::Aggregate;
use crate::command::{CommandHandler, CommandResult, MAX_CONFLICT_RETRIES};
use crate::error::DomainError;
use crate::events::SocialEvent;
use crate::user::{CreateUser, Follow, Post, PostText, SendPost, Unfollow, User, UserError};

/// Service for the social feed's write side.
///
/// Every user a command touches is loaded by replay and created on the
/// spot if it has no events yet. Posting fans out synchronously to the
/// author's followers. Several services may share one store.
pub struct FeedService<S: EventStore<Event = SocialEvent>> {
    bus: Arc<EventBus<S>>,
    users: CommandHandler<S, User>,
}

impl<S: EventStore<Event = SocialEvent>> FeedService<S> {
    /// Creates a new feed service over the given store, with tracing and
    /// metrics subscribers on its bus.
    pub fn new(store: S) -> Self {
        let bus = EventBus::new(store)
            .with_subscriber(Box::new(TracingSubscriber))
            .with_subscriber(Box::new(MetricsSubscriber));
        Self::with_bus(bus)
    }

    /// Creates a new feed service publishing through a preconfigured bus.
    pub fn with_bus(bus: EventBus<S>) -> Self {
        let bus = Arc::new(bus);
        Self {
            users: CommandHandler::new(Arc::clone(&bus)),
            bus,
        }
    }

    /// Returns a reference to the underlying event store.
    pub fn store(&self) -> &S {
        self.bus.store()
    }

    /// Returns a reference to the user command handler.
    pub fn users(&self) -> &CommandHandler<S, User> {
        &self.users
    }

    /// Creates a user. Creating an existing user emits nothing.
    #[tracing::instrument(skip(self))]
    pub fn create_user(&self, cmd: CreateUser) -> Result<CommandResult<User>, DomainError> {
        self.users.handle(&cmd, |user| user.create(&cmd.user_id))
    }

    /// Publishes a post and delivers it to every current follower.
    ///
    /// Text is validated before anything is emitted. Events are published
    /// in this order: the author's UserCreated if new, PostCreated,
    /// PostSent, then one PostReceived per follower in follow order.
    #[tracing::instrument(skip(self), fields(author = %cmd.author))]
    pub fn post(&self, cmd: SendPost) -> Result<PostId, DomainError> {
        let text = PostText::parse(cmd.text.as_str())?;
        self.users
            .handle(&cmd, auto_created(&cmd.author, |_| Ok(vec![])))?;

        let post_id = self.create_post(&cmd.author, &text)?;

        let sent = self
            .users
            .handle(&cmd, auto_created(&cmd.author, |user| user.post(&text)))?;
        let timestamp = sent
            .events
            .last()
            .map(|event| event.timestamp)
            .unwrap_or_else(chrono::Utc::now);
        let post = Post::new(cmd.author.clone(), text.as_str(), timestamp);

        metrics::counter!("posts_created_total").increment(1);

        // Followers as of the PostSent append; deliveries never roll each other back
        let followers = sent.aggregate.followers().to_vec();
        for follower in &followers {
            if let Err(e) = self.deliver(follower, &post) {
                tracing::warn!(
                    post_id = %post_id,
                    follower = %follower,
                    error = %e,
                    "failed to deliver post"
                );
                metrics::counter!("post_deliveries_failed_total").increment(1);
            }
        }

        tracing::info!(post_id = %post_id, recipients = followers.len(), "post published");
        Ok(post_id)
    }

    /// Makes `cmd.follower` follow `cmd.followed`.
    ///
    /// Records FollowingStarted on the follower and FollowerAdded on the
    /// followed user as two separate steps.
    #[tracing::instrument(skip(self))]
    pub fn follow(&self, cmd: Follow) -> Result<(), DomainError> {
        self.users.handle(
            &cmd,
            auto_created(&cmd.follower, |user| user.follow(&cmd.followed)),
        )?;
        self.users.execute(
            &AggregateId::user(&cmd.followed),
            auto_created(&cmd.followed, |user| user.add_follower(&cmd.follower)),
        )?;
        Ok(())
    }

    /// Makes `cmd.follower` stop following `cmd.followed`.
    #[tracing::instrument(skip(self))]
    pub fn unfollow(&self, cmd: Unfollow) -> Result<(), DomainError> {
        self.users.handle(
            &cmd,
            auto_created(&cmd.follower, |user| user.unfollow(&cmd.followed)),
        )?;
        self.users.execute(
            &AggregateId::user(&cmd.followed),
            auto_created(&cmd.followed, |user| user.remove_follower(&cmd.follower)),
        )?;
        Ok(())
    }

    /// Drops every recorded event. Post numbering starts over at 1.
    pub fn reset_all(&self) -> Result<(), DomainError> {
        self.bus.store().clear()?;
        tracing::info!("event log reset");
        Ok(())
    }

    fn deliver(&self, recipient: &UserId, post: &Post) -> Result<(), DomainError> {
        self.users.execute(
            &AggregateId::user(recipient),
            auto_created(recipient, |user| user.receive(post)),
        )?;
        Ok(())
    }

    /// Records PostCreated under the next free post id.
    ///
    /// The id is one past the highest post id in the log. A post stream
    /// must be empty to be claimed, so racing writers never share an id.
    fn create_post(&self, author: &UserId, text: &PostText) -> Result<PostId, DomainError> {
        let mut retries = 0;
        loop {
            let post_id = self.next_post_id()?;
            let created = SocialEvent::post_created(post_id, author.clone(), text.as_str());

            match self.bus.publish_all(vec![created], AppendOptions::expect_new()) {
                Ok(_) => return Ok(post_id),
                Err(e) if e.is_conflict() && retries < MAX_CONFLICT_RETRIES => {
                    retries += 1;
                    tracing::debug!(post_id = %post_id, retries, "post id taken, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn next_post_id(&self) -> Result<PostId, DomainError> {
        let highest = self
            .store()
            .get_events_by_category(AggregateCategory::Post)?
            .iter()
            .filter_map(|envelope| envelope.aggregate_id().as_post())
            .map(|post_id| post_id.as_u64())
            .max()
            .unwrap_or(0);
        Ok(PostId::new(highest + 1))
    }
}

/// Wraps a user command so it first creates the user if needed.
///
/// The creation and the command's own events go out as one batch.
fn auto_created<'a, F>(
    user_id: &'a UserId,
    command: F,
) -> impl Fn(&User) -> Result<Vec<SocialEvent>, UserError> + 'a
where
    F: Fn(&User) -> Result<Vec<SocialEvent>, UserError> + 'a,
{
    move |user| {
        let mut events = user.create(user_id)?;
        if events.is_empty() {
            return command(user);
        }

        let mut created = user.clone();
        created.apply_events(&events);
        events.extend(command(&created)?);
        Ok(events)
    }
}
