//! Thread and message endpoints

use crate::client::SpacesClient;
use crate::error::ApiResult;
use crate::models::{CreatedMessage, CreatedThread, Sorting, TextContent, Thread};
use crate::query::QueryParams;
use uuid::Uuid;

/// Thread API interface
#[derive(Clone)]
pub struct ThreadsApi {
    client: SpacesClient,
}

impl ThreadsApi {
    pub(crate) fn new(client: SpacesClient) -> Self {
        Self { client }
    }

    /// A thread with one page of its messages
    ///
    /// GET /spaces/:spaceid/threads/:threadid?messages_count=&messages_offset=&sort=
    pub async fn with_messages(
        &self,
        space_id: Uuid,
        thread_id: Uuid,
        sort: Sorting,
        count: u32,
        offset: u32,
    ) -> ApiResult<Thread> {
        let path = format!(
            "/spaces/{space_id}/threads/{thread_id}{}",
            messages_query(sort, count, offset)
        );
        self.client.get(&path).await
    }

    /// POST /spaces/:spaceid/threads/:threadid/messages
    pub async fn create_message(
        &self,
        space_id: Uuid,
        thread_id: Uuid,
        content: &str,
    ) -> ApiResult<CreatedMessage> {
        let path = format!("/spaces/{space_id}/threads/{thread_id}/messages");
        self.client.post(&path, &TextContent::new(content)).await
    }

    /// Open a reply thread under a message
    ///
    /// POST /spaces/:spaceid/threads/:threadid/messages/:messageid/threads
    pub async fn create_sub_thread(
        &self,
        space_id: Uuid,
        thread_id: Uuid,
        message_id: Uuid,
    ) -> ApiResult<CreatedThread> {
        let path = format!("/spaces/{space_id}/threads/{thread_id}/messages/{message_id}/threads");
        self.client
            .fetch_api(reqwest::Method::POST, &path, None::<&()>)
            .await
    }
}

fn messages_query(sort: Sorting, count: u32, offset: u32) -> String {
    QueryParams::new()
        .param("sort", sort)
        .param("messages_offset", offset)
        .param("messages_count", count)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_query() {
        assert_eq!(
            messages_query(Sorting::Popularity, 25, 50),
            "?messages_count=25&messages_offset=50&sort=popularity"
        );
    }
}
