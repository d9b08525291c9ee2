// GraphQL API for the dice and message board
// This provides the query/mutation roots and the GraphQL views of our models

use std::net::SocketAddr;
use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, Schema, SimpleObject, ID,
};
use rand::Rng;
use tracing::debug;

use crate::engine::storage::{InMemoryMessageStorage, MessageStorage};
use crate::models::{roll_dice, Message, MessageInput, RandomDie};
use crate::DiceMessagesError;

/// The two answers `quoteOfTheDay` picks between
pub const QUOTES: [&str; 2] = ["Take it easy", "Salvation lies within"];

/// Pick one of [`QUOTES`] with equal probability
pub fn quote_of_the_day_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    if rng.gen::<f64>() < 0.5 {
        QUOTES[0]
    } else {
        QUOTES[1]
    }
}

/// Address of the peer that sent the current request
///
/// The transport layer attaches this to each GraphQL request as request
/// data; the `ip` resolver is the only field that reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub SocketAddr);

// GraphQL types - these are the API representations of our domain models

#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
#[graphql(name = "Message")]
pub struct MessageGQL {
    pub id: ID,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl From<Message> for MessageGQL {
    fn from(message: Message) -> Self {
        Self {
            id: ID(message.id),
            content: message.content,
            author: message.author,
        }
    }
}

#[derive(InputObject, Debug, Clone, Default)]
#[graphql(name = "MessageInput")]
pub struct MessageInputGQL {
    pub content: Option<String>,
    pub author: Option<String>,
}

impl From<MessageInputGQL> for MessageInput {
    fn from(input: MessageInputGQL) -> Self {
        Self {
            content: input.content,
            author: input.author,
        }
    }
}

/// GraphQL view of a [`RandomDie`]
pub struct RandomDieGQL(pub RandomDie);

#[Object(name = "RandomDie")]
impl RandomDieGQL {
    async fn num_sides(&self) -> i32 {
        self.0.num_sides
    }

    /// Roll the die once
    async fn roll_once(&self) -> i32 {
        self.0.roll_once()
    }

    /// Roll the die `numRolls` times
    async fn roll(&self, num_rolls: i32) -> Vec<i32> {
        self.0.roll(num_rolls)
    }
}

/// Translate library errors into GraphQL field errors with a `code` extension
impl ErrorExtensions for DiceMessagesError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| match self {
            DiceMessagesError::MessageNotFound { .. } => e.set("code", "NOT_FOUND"),
            DiceMessagesError::Config(_) => e.set("code", "CONFIG"),
            DiceMessagesError::Internal(_) => e.set("code", "INTERNAL"),
        })
    }
}

/// Resolve a nullable message field, reporting a missing message as an error
/// on this field only
///
/// Returning `Err` from a resolver aborts the whole operation, so a missing
/// message is pushed onto the response's error list (with this field's path)
/// and the field itself resolves to `null`. Sibling fields keep their data.
fn message_or_field_error(
    ctx: &Context<'_>,
    result: crate::Result<Message>,
) -> async_graphql::Result<Option<MessageGQL>> {
    match result {
        Ok(message) => Ok(Some(message.into())),
        Err(e @ DiceMessagesError::MessageNotFound { .. }) => {
            debug!("{}", e);
            ctx.add_error(ctx.set_error_path(e.extend().into_server_error(ctx.item.pos)));
            Ok(None)
        }
        Err(e) => Err(e.extend()),
    }
}

// GraphQL Query root
pub struct Query;

#[Object]
impl Query {
    async fn hello(&self) -> String {
        "Hello World!".to_string()
    }

    /// One of two canned quotes, picked at random
    async fn quote_of_the_day(&self) -> String {
        quote_of_the_day_with(&mut rand::thread_rng()).to_string()
    }

    /// A uniform random number in [0, 1)
    async fn random(&self) -> f64 {
        rand::thread_rng().gen()
    }

    async fn roll_three_dice(&self) -> Vec<i32> {
        roll_dice(&mut rand::thread_rng(), 3, None)
    }

    /// Roll `numDice` dice with `numSides` sides each (six when omitted or zero)
    async fn roll_dice(&self, num_dice: i32, num_sides: Option<i32>) -> Vec<i32> {
        roll_dice(&mut rand::thread_rng(), num_dice, num_sides)
    }

    async fn get_die(&self, num_sides: Option<i32>) -> RandomDieGQL {
        RandomDieGQL(RandomDie::new(num_sides))
    }

    /// Get a message by ID
    async fn get_message(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<MessageGQL>> {
        let storage = ctx.data::<Arc<dyn MessageStorage>>()?;
        let result = storage.get_message(&id).await;
        message_or_field_error(ctx, result)
    }

    /// IP address of the client that sent this request
    async fn ip(&self, ctx: &Context<'_>) -> Option<String> {
        ctx.data_opt::<RemoteAddr>()
            .map(|RemoteAddr(addr)| addr.ip().to_string())
    }
}

// GraphQL Mutation root
pub struct Mutation;

#[Object]
impl Mutation {
    /// Store a new message under a generated id
    async fn create_message(
        &self,
        ctx: &Context<'_>,
        input: Option<MessageInputGQL>,
    ) -> async_graphql::Result<MessageGQL> {
        let storage = ctx.data::<Arc<dyn MessageStorage>>()?;
        let input = input.map(MessageInput::from).unwrap_or_default();

        let message = storage.create_message(input).await.map_err(|e| e.extend())?;
        debug!("createMessage -> {}", message.id);
        Ok(message.into())
    }

    /// Replace the content and author of an existing message
    ///
    /// Fields left out of `input` are cleared, not kept.
    async fn update_message(
        &self,
        ctx: &Context<'_>,
        id: ID,
        input: Option<MessageInputGQL>,
    ) -> async_graphql::Result<Option<MessageGQL>> {
        let storage = ctx.data::<Arc<dyn MessageStorage>>()?;
        let input = input.map(MessageInput::from).unwrap_or_default();

        let result = storage.update_message(&id, input).await;
        message_or_field_error(ctx, result)
    }
}

pub type DiceMessagesSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create schema backed by a fresh in-memory message store
pub fn create_schema() -> DiceMessagesSchema {
    create_schema_with_storage(Arc::new(InMemoryMessageStorage::new()))
}

/// Create schema with storage backend
pub fn create_schema_with_storage(storage: Arc<dyn MessageStorage>) -> DiceMessagesSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(storage)
        .finish()
}
