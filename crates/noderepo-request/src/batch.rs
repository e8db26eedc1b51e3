//! Ordered batches of requests with update coalescing.

use crate::request::{GraphRequest, Request};
use tracing::trace;

/// Requests queued for one processor, in submission order.
///
/// Consecutive updates of the same node in the same workspace collapse into
/// one request via [`UpdatePropertiesRequest::merge_with`], so the processor
/// sees a single update carrying the final value of every property.
///
/// [`UpdatePropertiesRequest::merge_with`]: crate::UpdatePropertiesRequest::merge_with
#[derive(Debug, Clone, Default)]
pub struct RequestBatch {
    requests: Vec<GraphRequest>,
}

impl RequestBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request, merging it into the previous one when both are
    /// updates of the same node that no processor has resolved yet.
    pub fn push(&mut self, request: impl Into<GraphRequest>) {
        let request = request.into();
        if let (
            Some(GraphRequest::UpdateProperties(previous)),
            GraphRequest::UpdateProperties(next),
        ) = (self.requests.last_mut(), &request)
            && previous.actual_location_of_node().is_none()
            && next.actual_location_of_node().is_none()
            && previous.targets_same_node(next)
        {
            let merged = previous.merged_onto(next);
            trace!(
                on = %merged.on(),
                properties = merged.properties().len(),
                "coalesced update into previous request"
            );
            *previous = merged;
            return;
        }
        self.requests.push(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Whether every queued request is read-only; an empty batch is.
    pub fn is_read_only(&self) -> bool {
        self.requests.iter().all(Request::is_read_only)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GraphRequest> {
        self.requests.iter()
    }

    /// Mutable access for the processor recording outcomes.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, GraphRequest> {
        self.requests.iter_mut()
    }

    pub fn into_requests(self) -> Vec<GraphRequest> {
        self.requests
    }
}

impl IntoIterator for RequestBatch {
    type Item = GraphRequest;
    type IntoIter = std::vec::IntoIter<GraphRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

impl<'a> IntoIterator for &'a RequestBatch {
    type Item = &'a GraphRequest;
    type IntoIter = std::slice::Iter<'a, GraphRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}
