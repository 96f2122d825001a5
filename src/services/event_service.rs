use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::store::EventStore;

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventStore>) -> Self {
        Self { events }
    }

    pub async fn create_event(
        &self,
        created_by: i64,
        request: CreateEventRequest,
    ) -> AppResult<EventResponse> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        match (request.latitude, request.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                    return Err(AppError::ValidationError(
                        "Venue coordinates out of range".to_string(),
                    ));
                }
            }
            (None, None) => {}
            _ => {
                return Err(AppError::ValidationError(
                    "Latitude and longitude must be given together".to_string(),
                ));
            }
        }

        let event = self
            .events
            .insert_event(NewEvent {
                title,
                description: request.description.filter(|d| !d.trim().is_empty()),
                venue: request.venue.filter(|v| !v.trim().is_empty()),
                latitude: request.latitude,
                longitude: request.longitude,
                starts_at: request.starts_at,
                created_by,
            })
            .await?;
        log::info!("Event {} created by user {created_by}", event.id);
        Ok(EventResponse::from(event))
    }

    pub async fn get_event(&self, id: i64) -> AppResult<EventResponse> {
        self.events
            .find_event(id)
            .await?
            .map(EventResponse::from)
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))
    }

    pub async fn list_events(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<EventResponse>> {
        let (items, total) = self
            .events
            .list_events(params.offset(), params.page_size())
            .await?;
        let items = items.into_iter().map(EventResponse::from).collect();
        Ok(PaginatedResponse::new(items, params, total))
    }

    pub async fn delete_event(&self, id: i64) -> AppResult<()> {
        if !self.events.delete_event(id).await? {
            return Err(AppError::NotFound("Event not found".to_string()));
        }
        log::info!("Event {id} deleted");
        Ok(())
    }
}
