use fetcher::{NoAuth, sources::gitlab};
use payloads::{
    GitlabApi, ProjectId,
    responses::{Project, ProjectInfo},
};
use std::rc::Rc;
use yew::prelude::*;

use super::{FetchHookReturn, use_fetch};

/// Projects for the merge request form, fetched once per mount.
#[hook]
pub fn use_user_projects<C>(client: Rc<C>) -> FetchHookReturn<Vec<Project>>
where
    C: GitlabApi + 'static,
{
    use_fetch(Some(()), Rc::new(NoAuth), move |()| async move {
        gitlab::user_projects(&*client).await
    })
}

/// Details of the project picked in the dropdown. `selection` is the raw
/// dropdown value; anything that isn't a project id fetches nothing.
#[hook]
pub fn use_project_info<C>(
    client: Rc<C>,
    selection: Option<String>,
) -> FetchHookReturn<ProjectInfo>
where
    C: GitlabApi + 'static,
{
    let key = selection.map(|value| ProjectId::parse_selection(&value));
    use_fetch(key, Rc::new(NoAuth), move |project_id| async move {
        gitlab::project_info(&*client, project_id).await
    })
}
