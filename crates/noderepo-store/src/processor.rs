//! The seam between requests and whatever executes them.

use crate::error::ProcessError;
use noderepo_request::{GraphRequest, ReadPropertyRequest, RequestBatch, UpdatePropertiesRequest};

/// Executes requests and records their outcomes on them.
///
/// Implementations take each request by `&mut`, so exactly one processor
/// writes a request's outcome slots; afterwards the request may be shared
/// read-only.
pub trait RequestProcessor {
    fn process_read_property(
        &mut self,
        request: &mut ReadPropertyRequest,
    ) -> Result<(), ProcessError>;

    fn process_update_properties(
        &mut self,
        request: &mut UpdatePropertiesRequest,
    ) -> Result<(), ProcessError>;

    fn process(&mut self, request: &mut GraphRequest) -> Result<(), ProcessError> {
        match request {
            GraphRequest::ReadProperty(request) => self.process_read_property(request),
            GraphRequest::UpdateProperties(request) => self.process_update_properties(request),
        }
    }

    /// Process a batch in order, stopping at the first failure.
    ///
    /// Returns the number of requests processed.
    fn process_batch(&mut self, batch: &mut RequestBatch) -> Result<usize, ProcessError> {
        let mut processed = 0;
        for request in batch.iter_mut() {
            self.process(request)?;
            processed += 1;
        }
        Ok(processed)
    }
}
