//! The friends pane: accepted list, incoming pending requests, and the
//! add-friend flow.
//!
//! Friend rows are directional (requester → target). Accepting an incoming
//! request flips its status; rejecting deletes the row. The target of a new
//! request is resolved to a real user by display name — an unknown name is a
//! validation error and nothing is created.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use voxen_gateway::{
    AuthUser, Filter, Friend, FriendDraft, FriendPatch, FriendStatus, Gateway, ListQuery,
    UserProfile,
};
use voxen_shared::types::{FriendId, UserId};

use crate::error::ClientError;
use crate::notify::{reject, surface, Notifier};
use crate::session::Session;
use crate::sync::SyncedList;

const UNKNOWN_USER: &str = "Unknown User";

/// The friends / pending-requests view.
pub struct FriendsPane<G> {
    gateway: Arc<G>,
    notices: Notifier,
    user: AuthUser,
    accepted: SyncedList<Friend>,
    pending: SyncedList<Friend>,
    names: HashMap<UserId, String>,
    search: String,
}

impl<G: Gateway> FriendsPane<G> {
    /// Open the pane and fetch both lists.
    pub async fn open(session: &Session<G>) -> Self {
        let mut pane = Self {
            gateway: session.gateway().clone(),
            notices: session.notices().clone(),
            user: session.user().clone(),
            accepted: SyncedList::new(),
            pending: SyncedList::new(),
            names: HashMap::new(),
            search: String::new(),
        };
        let _ = pane.refresh().await;
        pane
    }

    /// Accepted friendships where this user is the requester.
    pub fn accepted(&self) -> &[Friend] {
        self.accepted.items()
    }

    /// Incoming requests awaiting a decision.
    pub fn pending(&self) -> &[Friend] {
        self.pending.items()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// The accepted list filtered by the search box.
    pub fn filtered(&self) -> Vec<&Friend> {
        let query = self.search.to_lowercase();
        self.accepted
            .items()
            .iter()
            .filter(|f| {
                query.is_empty()
                    || self
                        .display_name(&f.target_id)
                        .to_lowercase()
                        .contains(&query)
            })
            .collect()
    }

    /// Display name of the other party, from the resolved profile map.
    pub fn display_name(&self, user_id: &UserId) -> &str {
        self.names
            .get(user_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_USER)
    }

    /// Re-fetch both lists and the display names for everyone on them.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.refresh_accepted().await?;
        self.refresh_pending().await?;
        self.resolve_names().await?;
        Ok(())
    }

    pub async fn refresh_accepted(&mut self) -> Result<(), ClientError> {
        let fetched: Vec<Friend> = self
            .gateway
            .list(ListQuery::new().filter(Filter::and([
                Filter::eq("requesterId", self.user.id.as_str()),
                Filter::eq("status", "accepted"),
            ])))
            .await
            .map_err(|e| surface(&self.notices, "Failed to load friends", e))?;
        self.accepted.replace(fetched);
        Ok(())
    }

    pub async fn refresh_pending(&mut self) -> Result<(), ClientError> {
        let fetched: Vec<Friend> = self
            .gateway
            .list(ListQuery::new().filter(Filter::and([
                Filter::eq("targetId", self.user.id.as_str()),
                Filter::eq("status", "pending"),
            ])))
            .await
            .map_err(|e| surface(&self.notices, "Failed to load pending requests", e))?;
        self.pending.replace(fetched);
        Ok(())
    }

    /// Send a friend request to the user with the given display name.
    pub async fn send_request(&mut self, name: &str) -> Result<(), ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        let matches: Vec<UserProfile> = self
            .gateway
            .list(
                ListQuery::new()
                    .filter(Filter::eq("displayName", name))
                    .limit(1),
            )
            .await
            .map_err(|e| surface(&self.notices, "Failed to send friend request", e))?;

        let target = match matches.into_iter().next() {
            Some(profile) => profile.user_id,
            None => {
                return Err(reject(
                    &self.notices,
                    "User not found",
                    format!("No user named \"{name}\" was found"),
                ));
            }
        };
        if target == self.user.id {
            return Err(reject(
                &self.notices,
                "Invalid request",
                "You cannot add yourself",
            ));
        }

        let draft = FriendDraft {
            id: FriendId::new(),
            requester_id: self.user.id.clone(),
            target_id: target.clone(),
            status: FriendStatus::Pending,
        };
        self.gateway
            .create::<Friend>(draft)
            .await
            .map_err(|e| surface(&self.notices, "Failed to send friend request", e))?;

        info!(to = %target, "friend request sent");
        self.notices
            .info("Friend request sent", format!("Request sent to {name}"));
        Ok(())
    }

    /// Accept an incoming request: pending → accepted, then re-fetch.
    pub async fn accept(&mut self, id: FriendId) -> Result<(), ClientError> {
        self.gateway
            .update::<Friend>(
                id.0,
                FriendPatch {
                    status: FriendStatus::Accepted,
                },
            )
            .await
            .map_err(|e| surface(&self.notices, "Failed to accept friend request", e))?;

        info!(request = %id, "friend request accepted");
        self.refresh().await
    }

    /// Reject an incoming request: the row is deleted outright.
    pub async fn reject_request(&mut self, id: FriendId) -> Result<(), ClientError> {
        self.gateway
            .delete::<Friend>(id.0)
            .await
            .map_err(|e| surface(&self.notices, "Failed to reject friend request", e))?;

        info!(request = %id, "friend request rejected");
        self.refresh_pending().await
    }

    async fn resolve_names(&mut self) -> Result<(), ClientError> {
        let mut others: Vec<String> = self
            .accepted
            .items()
            .iter()
            .map(|f| f.target_id.as_str().to_string())
            .chain(
                self.pending
                    .items()
                    .iter()
                    .map(|f| f.requester_id.as_str().to_string()),
            )
            .collect();
        others.sort();
        others.dedup();

        if others.is_empty() {
            self.names.clear();
            return Ok(());
        }

        let profiles: Vec<UserProfile> = self
            .gateway
            .list(ListQuery::new().filter(Filter::is_in("userId", others)))
            .await
            .map_err(|e| surface(&self.notices, "Failed to load friends", e))?;

        self.names = profiles
            .into_iter()
            .map(|p| (p.user_id, p.display_name))
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::signed_in;
    use chrono::Utc;
    use voxen_shared::types::{PresenceStatus, ProfileId};

    fn profile(user_id: &str, display_name: &str) -> UserProfile {
        UserProfile {
            id: ProfileId::new(),
            user_id: UserId::from(user_id),
            display_name: display_name.to_string(),
            bio: None,
            status: PresenceStatus::Online,
            avatar_url: None,
            background_url: None,
            theme_colors: None,
            created_at: Utc::now(),
        }
    }

    fn incoming_request(from: &str, to: &str) -> Friend {
        Friend {
            id: FriendId::new(),
            requester_id: UserId::from(from),
            target_id: UserId::from(to),
            status: FriendStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn accepting_transitions_status_and_clears_pending() {
        let (gateway, session) = signed_in();
        let request = incoming_request("user_bob", "user_alice");
        gateway.insert_record(&request);
        gateway.insert_record(&profile("user_bob", "Bob"));

        let mut pane = FriendsPane::open(&session).await;
        assert_eq!(pane.pending().len(), 1);
        assert_eq!(pane.display_name(&UserId::from("user_bob")), "Bob");

        pane.accept(request.id).await.unwrap();

        assert!(pane.pending().is_empty());
        // The row survived with its status flipped.
        let rows: Vec<Friend> = gateway
            .list(ListQuery::new())
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, FriendStatus::Accepted);
    }

    #[tokio::test]
    async fn rejecting_deletes_the_row_for_good() {
        let (gateway, session) = signed_in();
        let request = incoming_request("user_bob", "user_alice");
        gateway.insert_record(&request);

        let mut pane = FriendsPane::open(&session).await;
        pane.reject_request(request.id).await.unwrap();

        assert!(pane.pending().is_empty());
        assert_eq!(gateway.collection_len("friends"), 0);

        // It does not reappear on a full reload.
        pane.refresh().await.unwrap();
        assert!(pane.pending().is_empty());
    }

    #[tokio::test]
    async fn request_resolves_a_real_user_by_display_name() {
        let (gateway, session) = signed_in();
        gateway.insert_record(&profile("user_bob", "Bob"));

        let mut pane = FriendsPane::open(&session).await;
        pane.send_request("Bob").await.unwrap();

        assert_eq!(gateway.collection_len("friends"), 1);
        let rows: Vec<Friend> = gateway.list(ListQuery::new()).await.unwrap();
        assert_eq!(rows[0].requester_id, UserId::from("user_alice"));
        assert_eq!(rows[0].target_id, UserId::from("user_bob"));
        assert_eq!(rows[0].status, FriendStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_name_is_rejected_and_nothing_is_created() {
        let (gateway, session) = signed_in();
        let mut pane = FriendsPane::open(&session).await;

        let result = pane.send_request("Nobody").await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert_eq!(gateway.collection_len("friends"), 0);

        // Blank input is a silent no-op.
        pane.send_request("   ").await.unwrap();
        assert_eq!(gateway.collection_len("friends"), 0);
    }

    #[tokio::test]
    async fn search_filters_the_accepted_list_by_name() {
        let (gateway, session) = signed_in();
        let mut bob = incoming_request("user_alice", "user_bob");
        bob.status = FriendStatus::Accepted;
        let mut carol = incoming_request("user_alice", "user_carol");
        carol.status = FriendStatus::Accepted;
        gateway.insert_record(&bob);
        gateway.insert_record(&carol);
        gateway.insert_record(&profile("user_bob", "Bob"));
        gateway.insert_record(&profile("user_carol", "Carol"));

        let mut pane = FriendsPane::open(&session).await;
        assert_eq!(pane.accepted().len(), 2);

        pane.set_search("car");
        let filtered = pane.filtered();
        assert_eq!(filtered.len(), 1);
        assert_eq!(pane.display_name(&filtered[0].target_id), "Carol");
    }
}
