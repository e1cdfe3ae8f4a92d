//! Admin panel for creating, updating and deleting profiles.
//!
//! The panel has a single edit target. Without a target the form adds new
//! profiles and with a target it updates the target. After every
//! successful write the whole list is loaded again from the store.

use std::sync::Arc;

use directory_model::{
    AvatarSize, Profile, ProfileContent, ProfileId, RenderState, ValidatedProfileContent,
};
use directory_utils::ContextExt;
use error_stack::{Result, ResultExt};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, watch};
use tracing::{error, info};

use crate::ViewContext;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profiles. Please try refreshing the page.";
pub const ADD_FAILED_MESSAGE: &str =
    "Failed to add profile. Please check the details and try again.";
pub const UPDATE_FAILED_MESSAGE: &str =
    "Failed to update profile. Please check the details and try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete profile. Please try again.";
pub const ADDED_MESSAGE: &str = "Profile added successfully!";
pub const UPDATED_MESSAGE: &str = "Profile updated successfully!";
pub const DELETED_MESSAGE: &str = "Profile deleted successfully!";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this profile?";
pub const NO_PROFILES_MESSAGE: &str = "No profiles found.";
pub const NO_ADDRESS: &str = "No address";

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminError {
    #[error("Another admin operation is in progress")]
    Busy,
    #[error("Profile is not in the admin profile list")]
    UnknownProfile,
    #[error("Delete is not confirmed")]
    ConfirmationRequired,
    #[error("Admin operation did not complete")]
    Interrupted,
}

/// Admin panel list item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminListItem {
    pub id: ProfileId,
    pub name: String,
    pub thumbnail_url: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "snake_case")]
pub enum FormMode {
    Add,
    Edit(ProfileId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminForm {
    pub mode: FormMode,
    pub title: &'static str,
    pub content: ProfileContent,
    pub submit_label: &'static str,
    pub can_cancel: bool,
    pub loading: bool,
    /// Form should be scrolled into view.
    pub focus: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminSnapshot {
    pub form: AdminForm,
    pub profiles: RenderState<Vec<AdminListItem>>,
    pub notice: Option<&'static str>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Delete which is waiting for user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    id: ProfileId,
}

impl PendingDeletion {
    pub fn id(&self) -> &ProfileId {
        &self.id
    }

    pub fn prompt(&self) -> &'static str {
        DELETE_PROMPT
    }
}

/// Outcome of the latest list load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListLoad {
    NotStarted,
    Loading,
    Loaded,
    Failed,
}

pub struct AdminPanel {
    context: ViewContext,
    /// Profiles from the latest successful load.
    profiles: Vec<Profile>,
    list_load: ListLoad,
    form_loading: bool,
    edit_target: Option<Profile>,
    form: ProfileContent,
    focus_form: bool,
    error: Option<String>,
    success: Option<String>,
    snapshots: watch::Sender<AdminSnapshot>,
}

impl AdminPanel {
    pub fn new(context: ViewContext) -> Self {
        let (snapshots, _) = watch::channel(AdminSnapshot {
            form: AdminForm::add(ProfileContent::default(), false),
            profiles: RenderState::Loading,
            notice: None,
            error: None,
            success: None,
        });
        Self {
            context,
            profiles: vec![],
            list_load: ListLoad::NotStarted,
            form_loading: false,
            edit_target: None,
            form: ProfileContent::default(),
            focus_form: false,
            error: None,
            success: None,
            snapshots,
        }
    }

    /// The latest list load succeeded.
    pub fn is_loaded(&self) -> bool {
        self.list_load == ListLoad::Loaded
    }

    pub fn edit_target(&self) -> Option<&ProfileId> {
        self.edit_target.as_ref().map(|p| &p.id)
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<AdminSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> AdminSnapshot {
        // Previously loaded profiles stay visible while reloading and after
        // a failed reload.
        let profiles = if self.profiles.is_empty() {
            match self.list_load {
                ListLoad::NotStarted | ListLoad::Loading => RenderState::Loading,
                ListLoad::Failed => RenderState::Error(LOAD_FAILED_MESSAGE.to_string()),
                ListLoad::Loaded => RenderState::Empty,
            }
        } else {
            RenderState::Ready(
                self.profiles
                    .iter()
                    .map(|p| AdminListItem {
                        id: p.id.clone(),
                        name: p.name.clone(),
                        thumbnail_url: self.context.avatars.image_url(p, AvatarSize::Thumbnail),
                        address: p.address.clone().unwrap_or_else(|| NO_ADDRESS.to_string()),
                    })
                    .collect(),
            )
        };

        let form = match &self.edit_target {
            Some(target) => AdminForm {
                mode: FormMode::Edit(target.id.clone()),
                title: "Edit Profile",
                content: self.form.clone(),
                submit_label: if self.form_loading {
                    "Saving..."
                } else {
                    "Update Profile"
                },
                can_cancel: true,
                loading: self.form_loading,
                focus: self.focus_form,
            },
            None => AdminForm::add(self.form.clone(), self.form_loading),
        };

        AdminSnapshot {
            form,
            notice: matches!(profiles, RenderState::Empty).then_some(NO_PROFILES_MESSAGE),
            profiles,
            error: self.error.clone(),
            success: self.success.clone(),
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    fn clear_form(&mut self) {
        self.edit_target = None;
        self.form = ProfileContent::default();
        self.focus_form = false;
    }

    /// Load the list from the store. Messages are cleared.
    pub async fn reload(&mut self) {
        self.clear_messages();
        self.load_list().await;
    }

    async fn load_list(&mut self) {
        self.list_load = ListLoad::Loading;
        self.publish();
        self.list_load = match self.context.store.list_profiles().await {
            Ok(profiles) => {
                self.profiles = profiles;
                ListLoad::Loaded
            }
            Err(e) => {
                error!("Loading admin profile list failed, error: {:?}", e);
                self.error = Some(LOAD_FAILED_MESSAGE.to_string());
                ListLoad::Failed
            }
        };
        self.publish();
    }

    /// Load profile to the form for editing.
    pub fn edit(&mut self, id: &ProfileId) -> Result<(), AdminError> {
        self.clear_messages();
        let profile = self
            .profiles
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or(AdminError::UnknownProfile.report())
            .attach_printable_lazy(|| id.to_string())?;
        self.form = ProfileContent::from(&profile);
        self.edit_target = Some(profile);
        self.focus_form = true;
        self.publish();
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.clear_messages();
        self.clear_form();
        self.publish();
    }

    /// Add a new profile or update the edit target.
    ///
    /// Invalid content does not reach the store. Store failures do not
    /// change the list.
    pub async fn submit(&mut self, content: ProfileContent) {
        self.clear_messages();
        self.focus_form = false;
        self.form = content;

        let validated = match self.form.validate() {
            Ok(validated) => validated,
            Err(e) => {
                self.error = Some(e.to_string());
                self.publish();
                return;
            }
        };

        self.form_loading = true;
        self.publish();

        let success = match self.edit_target.as_ref().map(|p| p.id.clone()) {
            Some(id) => self.update(&id, &validated).await,
            None => self.add(&validated).await,
        };

        if let Some(message) = success {
            self.clear_form();
            self.load_list().await;
            self.success = Some(message.to_string());
        }

        self.form_loading = false;
        self.publish();
    }

    async fn add(&mut self, content: &ValidatedProfileContent) -> Option<&'static str> {
        match self.context.store.add_profile(content).await {
            Ok(id) => {
                info!("Profile {} added", id);
                Some(ADDED_MESSAGE)
            }
            Err(e) => {
                error!("Adding profile failed, error: {:?}", e);
                self.error = Some(ADD_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    async fn update(
        &mut self,
        id: &ProfileId,
        content: &ValidatedProfileContent,
    ) -> Option<&'static str> {
        match self.context.store.update_profile(id, content).await {
            Ok(()) => {
                info!("Profile {} updated", id);
                Some(UPDATED_MESSAGE)
            }
            Err(e) => {
                error!("Updating profile {} failed, error: {:?}", id, e);
                self.error = Some(UPDATE_FAILED_MESSAGE.to_string());
                None
            }
        }
    }

    /// First step of deleting. The returned value must be confirmed with
    /// [AdminPanel::confirm_delete].
    pub fn request_delete(&mut self, id: &ProfileId) -> Result<PendingDeletion, AdminError> {
        self.clear_messages();
        self.publish();
        if !self.profiles.iter().any(|p| &p.id == id) {
            return Err(AdminError::UnknownProfile.report()).attach_printable(id.to_string());
        }
        Ok(PendingDeletion { id: id.clone() })
    }

    pub async fn confirm_delete(&mut self, pending: PendingDeletion) {
        match self.context.store.delete_profile(&pending.id).await {
            Ok(()) => {
                info!("Profile {} deleted", pending.id);
                if self.edit_target() == Some(&pending.id) {
                    self.clear_form();
                }
                self.load_list().await;
                self.success = Some(DELETED_MESSAGE.to_string());
            }
            Err(e) => {
                error!("Deleting profile {} failed, error: {:?}", pending.id, e);
                self.error = Some(DELETE_FAILED_MESSAGE.to_string());
            }
        }

        self.publish();
    }

    async fn run(&mut self, operation: Operation) {
        match operation {
            Operation::LoadIfNeeded => {
                if !self.is_loaded() {
                    self.reload().await;
                }
            }
            Operation::Reload => self.reload().await,
            Operation::Submit(content) => self.submit(content).await,
            Operation::Delete(pending) => self.confirm_delete(pending).await,
        }
    }
}

/// Admin panel operation which writes to or reads from the store.
enum Operation {
    LoadIfNeeded,
    Reload,
    Submit(ProfileContent),
    Delete(PendingDeletion),
}

impl AdminForm {
    fn add(content: ProfileContent, loading: bool) -> Self {
        Self {
            mode: FormMode::Add,
            title: "Add New Profile",
            content,
            submit_label: if loading { "Saving..." } else { "Add Profile" },
            can_cancel: false,
            loading,
            focus: false,
        }
    }
}

/// Admin panel shared between requests.
///
/// Operations do not wait for each other. An operation which starts while
/// another is running fails with [AdminError::Busy].
///
/// Store operations run in their own task, so they complete and release
/// the panel even if the caller stops waiting.
pub struct SharedAdminPanel {
    panel: Arc<Mutex<AdminPanel>>,
    snapshot: watch::Receiver<AdminSnapshot>,
}

impl SharedAdminPanel {
    pub fn new(panel: AdminPanel) -> Self {
        Self {
            snapshot: panel.subscribe(),
            panel: Arc::new(Mutex::new(panel)),
        }
    }

    fn lock(&self) -> Result<OwnedMutexGuard<AdminPanel>, AdminError> {
        self.panel
            .clone()
            .try_lock_owned()
            .change_context(AdminError::Busy)
    }

    async fn complete(
        mut panel: OwnedMutexGuard<AdminPanel>,
        operation: Operation,
    ) -> Result<AdminSnapshot, AdminError> {
        tokio::spawn(async move {
            panel.run(operation).await;
            panel.snapshot()
        })
        .await
        .change_context(AdminError::Interrupted)
    }

    /// Latest snapshot. Does not wait for running operations.
    pub fn snapshot(&self) -> AdminSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Load the list if it has not been loaded yet. If another operation
    /// is running, the latest snapshot is returned.
    pub async fn load_if_needed(&self) -> AdminSnapshot {
        let Ok(panel) = self.lock() else {
            return self.snapshot();
        };
        match Self::complete(panel, Operation::LoadIfNeeded).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Loading admin panel failed, error: {:?}", e);
                self.snapshot()
            }
        }
    }

    pub async fn reload(&self) -> Result<AdminSnapshot, AdminError> {
        Self::complete(self.lock()?, Operation::Reload).await
    }

    pub async fn edit(&self, id: &ProfileId) -> Result<AdminSnapshot, AdminError> {
        let mut panel = self.lock()?;
        panel.edit(id)?;
        Ok(panel.snapshot())
    }

    pub async fn cancel_edit(&self) -> Result<AdminSnapshot, AdminError> {
        let mut panel = self.lock()?;
        panel.cancel_edit();
        Ok(panel.snapshot())
    }

    pub async fn submit(&self, content: ProfileContent) -> Result<AdminSnapshot, AdminError> {
        Self::complete(self.lock()?, Operation::Submit(content)).await
    }

    /// Delete is done only if it is confirmed. Without confirmation
    /// [AdminError::ConfirmationRequired] is returned.
    pub async fn delete(
        &self,
        id: &ProfileId,
        confirmed: bool,
    ) -> Result<AdminSnapshot, AdminError> {
        let mut panel = self.lock()?;
        let pending = panel.request_delete(id)?;
        if !confirmed {
            return Err(AdminError::ConfirmationRequired.report())
                .attach_printable(pending.prompt());
        }
        Self::complete(panel, Operation::Delete(pending)).await
    }
}
