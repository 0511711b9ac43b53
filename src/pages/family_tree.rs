use leptos::prelude::*;
use log::{debug, warn};

use crate::api::{ApiClient, PersonNode};
use crate::components::family_tree::{CanvasTextMeasure, FamilyTreeCanvas, transform_forest};
use crate::error::ApiError;

/// What the tree page shows for a finished fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeOutcome {
	Failed,
	Empty,
	Ready(Vec<PersonNode>),
}

impl TreeOutcome {
	pub fn from_result(result: Result<Vec<PersonNode>, ApiError>) -> Self {
		match result {
			Err(e) => {
				warn!("family tree fetch failed: {e}");
				Self::Failed
			}
			Ok(roots) if roots.is_empty() => Self::Empty,
			Ok(roots) => Self::Ready(roots),
		}
	}
}

#[component]
pub fn FamilyTreePage() -> impl IntoView {
	let client = expect_context::<ApiClient>();
	let trees = LocalResource::new(move || {
		let client = client.clone();
		async move { client.family_tree().await }
	});
	let on_edited = Callback::new(move |_: ()| {
		debug!("refetching family tree after edit");
		trees.refetch();
	});

	view! {
		<div class="family-tree-page">
			<h1>"Family Tree"</h1>
			<div class="tree-container">
				{move || match trees.get().map(TreeOutcome::from_result) {
					None => view! { <p class="muted">"Loading..."</p> }.into_any(),
					Some(TreeOutcome::Failed) => {
						view! { <p class="page-error">"Error loading family trees."</p> }.into_any()
					}
					Some(TreeOutcome::Empty) => {
						view! { <p class="muted">"No family trees found."</p> }.into_any()
					}
					Some(TreeOutcome::Ready(roots)) => {
						let forest = transform_forest(&roots, &CanvasTextMeasure::new());
						view! { <FamilyTreeCanvas forest=forest on_edited=on_edited /> }.into_any()
					}
				}}
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_list_is_not_an_error() {
		assert_eq!(TreeOutcome::from_result(Ok(Vec::new())), TreeOutcome::Empty);
	}

	#[test]
	fn any_failure_is_reported_the_same_way() {
		let outcome = TreeOutcome::from_result(Err(ApiError::Server {
			status: 500,
			message: "boom".into(),
		}));
		assert_eq!(outcome, TreeOutcome::Failed);
	}

	#[test]
	fn roots_are_passed_on() {
		let root = PersonNode::default();
		assert_eq!(
			TreeOutcome::from_result(Ok(vec![root.clone()])),
			TreeOutcome::Ready(vec![root])
		);
	}
}
