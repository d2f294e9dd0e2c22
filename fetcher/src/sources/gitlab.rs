//! Merge request form: project list, per-project details, submission.

use payloads::{
    GitlabApi, ProjectId,
    requests::CreateMergeRequest,
    responses::{
        Branch, Label, MergeRequest, Milestone, Project, ProjectInfo, User,
    },
};

use crate::{FetchError, FetchState, Notification, telemetry::log_error};

/// Projects for the project dropdown. Keyed by `()`: fetched once per mount.
pub async fn user_projects<C: GitlabApi>(
    client: &C,
) -> Result<Vec<Project>, FetchError> {
    Ok(client.user_projects().await?)
}

/// Members, labels, milestones and branches of the selected project.
pub async fn project_info<C: GitlabApi>(
    client: &C,
    project_id: ProjectId,
) -> Result<ProjectInfo, FetchError> {
    tracing::info!("get projectinfo for project id '{project_id}'");
    let (members, labels, milestones, branches) = futures::try_join!(
        client.project_members(project_id),
        client.project_labels(project_id),
        client.project_milestones(project_id),
        client.project_branches(project_id),
    )?;
    Ok(ProjectInfo {
        members,
        labels,
        milestones,
        branches,
    })
}

/// Validate the form values, then create the merge request. Validation
/// failures return before any request is made.
pub async fn create_merge_request<C: GitlabApi>(
    client: &C,
    details: &CreateMergeRequest,
) -> Result<MergeRequest, FetchError> {
    details.validate()?;
    Ok(client.create_merge_request(details).await?)
}

/// Submit action of the form, reporting the outcome as a notification.
pub async fn submit_merge_request<C: GitlabApi>(
    client: &C,
    details: &CreateMergeRequest,
) -> Notification {
    match create_merge_request(client, details).await {
        Ok(merge_request) => {
            tracing::info!(
                iid = merge_request.iid,
                "created merge request {:?}",
                merge_request.title
            );
            Notification::success("Merge Request created")
                .with_message("Merge Request creation successful")
        }
        Err(e) => {
            let notification =
                Notification::failure("Error").with_message(e.to_string());
            log_error(e);
            notification
        }
    }
}

/// Branches offered as a merge request source: everything but the
/// protected branch.
pub fn source_branch_choices<'a>(
    branches: &'a [Branch],
    protected_branch: &str,
) -> Vec<&'a Branch> {
    branches
        .iter()
        .filter(|branch| branch.name != protected_branch)
        .collect()
}

/// The preferred branch if it is among the choices, else the first choice,
/// else empty (no selection).
pub fn default_source_branch(
    choices: &[&Branch],
    preferred: Option<&str>,
) -> String {
    if let Some(preferred) = preferred
        && choices.iter().any(|branch| branch.name == preferred)
    {
        return preferred.to_string();
    }
    choices
        .first()
        .map(|branch| branch.name.clone())
        .unwrap_or_default()
}

pub fn default_target_branch(project: &Project) -> Option<&str> {
    project
        .default_branch
        .as_deref()
        .filter(|branch| !branch.is_empty())
}

/// Everything the merge request form shows, derived from its two fetchers.
#[derive(Debug)]
pub struct MergeRequestForm<'a> {
    pub is_loading: bool,
    /// First error of either fetcher, projects first.
    pub error: Option<&'a str>,
    pub project: Option<&'a Project>,
    pub info: Option<&'a ProjectInfo>,
}

impl<'a> MergeRequestForm<'a> {
    pub fn from_states(
        projects: &'a FetchState<Vec<Project>>,
        info: &'a FetchState<ProjectInfo>,
        selected: ProjectId,
    ) -> Self {
        let project = projects
            .result()
            .and_then(|all| all.iter().find(|p| p.id == selected));
        Self {
            is_loading: projects.is_loading || info.is_loading,
            error: projects.error().or(info.error()),
            project,
            info: info.result(),
        }
    }

    pub fn members(&self) -> &'a [User] {
        self.info.map(|info| &info.members[..]).unwrap_or_default()
    }

    pub fn labels(&self) -> &'a [Label] {
        self.info.map(|info| &info.labels[..]).unwrap_or_default()
    }

    pub fn milestones(&self) -> &'a [Milestone] {
        self.info.map(|info| &info.milestones[..]).unwrap_or_default()
    }

    /// Branch choices only exist once both the project and its details are
    /// known.
    pub fn source_branches(&self, protected_branch: &str) -> Vec<&'a Branch> {
        match (self.project, self.info) {
            (Some(_), Some(info)) => {
                source_branch_choices(&info.branches, protected_branch)
            }
            _ => Vec::new(),
        }
    }

    pub fn target_branches(&self) -> &'a [Branch] {
        match (self.project, self.info) {
            (Some(_), Some(info)) => &info.branches,
            _ => &[],
        }
    }

    pub fn default_target_branch(&self) -> Option<&'a str> {
        self.info?;
        default_target_branch(self.project?)
    }

    /// Failure to show while either fetcher has an error.
    pub fn notification(&self) -> Option<Notification> {
        self.error.map(|error| {
            Notification::failure("Cannot create Merge Request")
                .with_message(error)
        })
    }
}
