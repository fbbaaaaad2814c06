//! Concurrent document fan-out.

use crate::source::KnowledgeSource;
use crate::types::DocumentContent;
use futures::future::join_all;

/// Fetch every document concurrently and keep the ones that arrived.
///
/// All fetches are started at once and awaited together; the barrier only
/// opens once each of them has settled. Failed fetches are logged and
/// dropped, so this never fails: if nothing could be fetched the result is
/// empty. Successful documents keep the order of `document_ids`.
pub async fn fetch_all(source: &dyn KnowledgeSource, document_ids: &[u64]) -> Vec<DocumentContent> {
    let fetches = document_ids.iter().map(|&document_id| async move {
        (document_id, source.fetch_document(document_id).await)
    });

    let settled = join_all(fetches).await;

    let documents: Vec<DocumentContent> = settled
        .into_iter()
        .filter_map(|(document_id, result)| match result {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!(document_id, error = %e, "Dropping document that failed to fetch");
                None
            }
        })
        .collect();

    tracing::debug!(
        requested = document_ids.len(),
        fetched = documents.len(),
        "Document fan-out settled"
    );

    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockKnowledgeSource;
    use std::time::Duration;

    fn doc(title: &str) -> DocumentContent {
        DocumentContent::new(
            title,
            format!("{} extract", title),
            format!("https://en.wikipedia.org/wiki/{}", title),
        )
    }

    #[tokio::test]
    async fn test_all_succeed() {
        let source = MockKnowledgeSource::new()
            .with_document(1, doc("One"))
            .with_document(2, doc("Two"));

        let docs = fetch_all(&source, &[1, 2]).await;
        assert_eq!(docs, vec![doc("One"), doc("Two")]);
        assert_eq!(source.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_successful_subset() {
        let source = MockKnowledgeSource::new()
            .with_document(1, doc("One"))
            .with_document(3, doc("Three"))
            .with_failing_document(2);

        let docs = fetch_all(&source, &[1, 2, 3, 4]).await;
        assert_eq!(docs, vec![doc("One"), doc("Three")]);
        assert!(docs.len() <= 4);
        // Every id was attempted, failures included
        assert_eq!(source.fetch_calls(), 4);
    }

    #[tokio::test]
    async fn test_all_fail_yields_empty() {
        let source = MockKnowledgeSource::new().with_failing_document(1);

        let docs = fetch_all(&source, &[1, 2]).await;
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let source = MockKnowledgeSource::new();
        assert!(fetch_all(&source, &[]).await.is_empty());
        assert_eq!(source.fetch_calls(), 0);
    }

    #[tokio::test]
    async fn test_output_follows_input_order_not_completion_order() {
        let source = MockKnowledgeSource::new()
            .with_document(1, doc("Slow"))
            .with_document(2, doc("Fast"))
            .with_fetch_delay(1, Duration::from_millis(50));

        let docs = fetch_all(&source, &[1, 2]).await;
        assert_eq!(docs, vec![doc("Slow"), doc("Fast")]);
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let source = MockKnowledgeSource::new()
            .with_document(1, doc("A"))
            .with_document(2, doc("B"))
            .with_document(3, doc("C"))
            .with_fetch_delay(1, Duration::from_millis(200))
            .with_fetch_delay(2, Duration::from_millis(200))
            .with_fetch_delay(3, Duration::from_millis(200));

        let start = std::time::Instant::now();
        let docs = fetch_all(&source, &[1, 2, 3]).await;

        assert_eq!(docs.len(), 3);
        // Sequential fetching would take at least 600ms
        assert!(start.elapsed() < Duration::from_millis(550));
    }
}
