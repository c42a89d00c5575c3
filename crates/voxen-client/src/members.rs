//! The member-list pane, grouped by role for display.

use std::sync::Arc;

use voxen_gateway::{Filter, Gateway, ListQuery, ServerMember};
use voxen_shared::types::{MemberRole, ServerId};

use crate::error::ClientError;
use crate::notify::{surface, Notifier};
use crate::session::Session;
use crate::sync::SyncedList;

/// The members of the selected server.
pub struct MemberPane<G> {
    gateway: Arc<G>,
    notices: Notifier,
    server_id: ServerId,
    members: SyncedList<ServerMember>,
}

impl<G: Gateway> MemberPane<G> {
    pub async fn open(session: &Session<G>, server_id: ServerId) -> Self {
        let mut pane = Self {
            gateway: session.gateway().clone(),
            notices: session.notices().clone(),
            server_id,
            members: SyncedList::new(),
        };
        let _ = pane.refresh().await;
        pane
    }

    pub fn members(&self) -> &[ServerMember] {
        self.members.items()
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let fetched: Vec<ServerMember> = self
            .gateway
            .list(ListQuery::new().filter(Filter::eq("serverId", self.server_id.to_string())))
            .await
            .map_err(|e| surface(&self.notices, "Failed to load members", e))?;

        self.members.replace(fetched);
        Ok(())
    }

    /// Members grouped for display: owner, admins, moderators, members.
    /// Empty groups are omitted.
    pub fn grouped(&self) -> Vec<(MemberRole, Vec<&ServerMember>)> {
        MemberRole::DISPLAY_ORDER
            .iter()
            .filter_map(|role| {
                let group: Vec<&ServerMember> = self
                    .members
                    .items()
                    .iter()
                    .filter(|m| m.role == *role)
                    .collect();
                (!group.is_empty()).then_some((*role, group))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::signed_in;
    use chrono::Utc;
    use voxen_shared::types::{MemberId, UserId};

    fn member(server_id: ServerId, user: &str, role: MemberRole) -> ServerMember {
        ServerMember {
            id: MemberId::new(),
            server_id,
            user_id: UserId::from(user),
            role,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn groups_follow_the_fixed_role_order() {
        let (gateway, session) = signed_in();
        let server_id = ServerId::new();

        gateway.insert_record(&member(server_id, "user_1", MemberRole::Member));
        gateway.insert_record(&member(server_id, "user_2", MemberRole::Owner));
        gateway.insert_record(&member(server_id, "user_3", MemberRole::Member));
        // A member of another server stays invisible.
        gateway.insert_record(&member(ServerId::new(), "user_4", MemberRole::Admin));

        let pane = MemberPane::open(&session, server_id).await;
        assert_eq!(pane.members().len(), 3);

        let grouped = pane.grouped();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, MemberRole::Owner);
        assert_eq!(grouped[0].1.len(), 1);
        assert_eq!(grouped[1].0, MemberRole::Member);
        assert_eq!(grouped[1].1.len(), 2);
    }
}
