mod directory;

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};
use products_hr::HrModule;

pub use directory::{MutationRoot, QueryRoot};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(Clone)]
pub struct GraphqlData {
    pub hr: Arc<HrModule>,
}

pub fn build_schema(data: GraphqlData) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(data)
        .finish()
}

/// SDL snapshot without any runtime data attached.
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}
