//! Device location feed.
//!
//! The platform location provider pushes readings through a
//! [`LocationPublisher`]; consumers hold a [`LocationFeed`]. A missing
//! location is a state, not an error: it gates the nearby queries.

use spaces_geo::Location;
use tokio::sync::watch;

/// Latest reading from the location provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationReading {
    /// `None` until a fix arrives, or when permission was denied
    pub location: Option<Location>,
    pub permission_granted: bool,
}

impl LocationReading {
    /// No fix yet, permission assumed until the provider says otherwise.
    pub const AWAITING: Self = Self {
        location: None,
        permission_granted: true,
    };

    pub fn fix(location: Location) -> Self {
        Self {
            location: Some(location),
            permission_granted: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            location: None,
            permission_granted: false,
        }
    }

    /// The location, or the reason there is none.
    pub fn require(&self) -> spaces_core::Result<Location> {
        match (self.location, self.permission_granted) {
            (Some(location), _) => Ok(location),
            (None, true) => Err(spaces_core::Error::location_unavailable()),
            (None, false) => Err(spaces_core::Error::location_permission_denied()),
        }
    }
}

impl Default for LocationReading {
    fn default() -> Self {
        Self::AWAITING
    }
}

/// Creates a connected publisher/feed pair starting at [`LocationReading::AWAITING`].
pub fn location_feed() -> (LocationPublisher, LocationFeed) {
    let (tx, rx) = watch::channel(LocationReading::AWAITING);
    (LocationPublisher { tx }, LocationFeed { rx })
}

/// Writing half, owned by the location provider
#[derive(Debug)]
pub struct LocationPublisher {
    tx: watch::Sender<LocationReading>,
}

impl LocationPublisher {
    pub fn publish(&self, location: Location) {
        self.set(LocationReading::fix(location));
    }

    pub fn deny_permission(&self) {
        self.set(LocationReading::denied());
    }

    /// Replaces the reading, notifying feeds only when it changed.
    pub fn set(&self, reading: LocationReading) {
        self.tx.send_if_modified(|current| {
            if *current == reading {
                false
            } else {
                *current = reading;
                true
            }
        });
    }

    pub fn subscribe(&self) -> LocationFeed {
        LocationFeed {
            rx: self.tx.subscribe(),
        }
    }
}

/// Reading half
#[derive(Debug, Clone)]
pub struct LocationFeed {
    rx: watch::Receiver<LocationReading>,
}

impl LocationFeed {
    pub fn current(&self) -> LocationReading {
        *self.rx.borrow()
    }

    /// Waits for the next reading; `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<LocationReading> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spaces_core::ErrorCode;

    #[tokio::test]
    async fn test_feed_starts_awaiting() {
        let (_publisher, feed) = location_feed();
        let reading = feed.current();
        assert_eq!(reading.location, None);
        assert!(reading.permission_granted);
        assert_eq!(
            reading.require().unwrap_err().code,
            ErrorCode::LocationUnavailable
        );
    }

    #[tokio::test]
    async fn test_publish_and_deny() {
        let (publisher, mut feed) = location_feed();
        let berlin = Location::new(52.52, 13.405);

        publisher.publish(berlin);
        assert_eq!(feed.changed().await, Some(LocationReading::fix(berlin)));
        assert_eq!(feed.current().require().unwrap(), berlin);

        publisher.deny_permission();
        let reading = feed.changed().await.unwrap();
        assert!(!reading.permission_granted);
        assert_eq!(
            reading.require().unwrap_err().code,
            ErrorCode::LocationPermissionDenied
        );
    }

    #[tokio::test]
    async fn test_identical_reading_does_not_notify() {
        let (publisher, mut feed) = location_feed();
        let loc = Location::new(1.0, 2.0);
        publisher.publish(loc);
        feed.changed().await.unwrap();

        publisher.publish(loc);
        let next = tokio::time::timeout(std::time::Duration::from_millis(20), feed.changed()).await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn test_feed_ends_with_publisher() {
        let (publisher, mut feed) = location_feed();
        drop(publisher);
        assert_eq!(feed.changed().await, None);
    }
}
