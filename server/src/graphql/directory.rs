use std::collections::BTreeSet;

use async_graphql::{Context, Object, Result, ResultExt};
use platform_api::ApiError;
use products_hr::{
    AnalyticsReport, Department, Employee, EmployeeId, FilterCriteria, HrError, PromotionNotice,
};
use tracing::{instrument, warn};

use super::GraphqlData;

fn data<'a>(ctx: &Context<'a>) -> Result<&'a GraphqlData> {
    ctx.data::<GraphqlData>()
}

fn to_api(err: HrError) -> ApiError {
    match err {
        HrError::NotFound(id) => ApiError::not_found(format!("employee {id}")),
        HrError::Source(_) => {
            ApiError::Unavailable("Failed to load employees. Please try again later.".into())
        }
        HrError::Task(err) => ApiError::internal(anyhow::Error::new(err)),
    }
}

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Employees matching the active search and filters.
    #[instrument(name = "graphql.employees", skip_all)]
    async fn employees(&self, ctx: &Context<'_>) -> Result<Vec<Employee>> {
        let hr = &data(ctx)?.hr;
        Ok(hr
            .with_store(|store| store.filtered_employees().into_iter().cloned().collect())
            .await)
    }

    #[instrument(name = "graphql.all_employees", skip_all)]
    async fn all_employees(&self, ctx: &Context<'_>) -> Result<Vec<Employee>> {
        let hr = &data(ctx)?.hr;
        Ok(hr.with_store(|store| store.employees().to_vec()).await)
    }

    /// Detail lookup; loads the directory first when nothing is cached.
    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(&self, ctx: &Context<'_>, id: EmployeeId) -> Result<Employee> {
        let hr = &data(ctx)?.hr;
        if let Err(err) = hr.ensure_loaded().await {
            warn!(error = %err, "directory unavailable for detail lookup");
        }
        hr.employee(id).await.map_err(to_api).extend()
    }

    /// Bookmarked employees in directory order.
    async fn bookmarked_employees(&self, ctx: &Context<'_>) -> Result<Vec<Employee>> {
        let hr = &data(ctx)?.hr;
        Ok(hr
            .with_store(|store| store.bookmarked_employees().into_iter().cloned().collect())
            .await)
    }

    async fn bookmarked_ids(&self, ctx: &Context<'_>) -> Result<Vec<EmployeeId>> {
        let hr = &data(ctx)?.hr;
        Ok(hr.with_store(|store| store.bookmarked_ids().to_vec()).await)
    }

    async fn filters(&self, ctx: &Context<'_>) -> Result<FilterCriteria> {
        let hr = &data(ctx)?.hr;
        Ok(hr.with_store(|store| store.filters().clone()).await)
    }

    #[instrument(name = "graphql.analytics", skip_all)]
    async fn analytics(&self, ctx: &Context<'_>) -> Result<AnalyticsReport> {
        Ok(data(ctx)?.hr.analytics().await)
    }

    async fn departments(&self) -> Vec<Department> {
        Department::ALL.to_vec()
    }

    /// Banner text when the last directory fetch failed.
    async fn load_error(&self, ctx: &Context<'_>) -> Result<Option<String>> {
        Ok(data(ctx)?.hr.load_error().await)
    }
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Refetches the directory page; returns the number of employees loaded.
    #[instrument(name = "graphql.refresh_employees", skip_all)]
    async fn refresh_employees(&self, ctx: &Context<'_>) -> Result<usize> {
        data(ctx)?.hr.refresh().await.map_err(to_api).extend()
    }

    /// Returns whether the employee is bookmarked afterwards.
    async fn toggle_bookmark(&self, ctx: &Context<'_>, id: EmployeeId) -> Result<bool> {
        let hr = &data(ctx)?.hr;
        hr.with_store_mut(move |store| store.toggle_bookmark(id))
            .await
            .map_err(to_api)
            .extend()
    }

    async fn remove_bookmarks(&self, ctx: &Context<'_>, ids: Vec<EmployeeId>) -> Result<usize> {
        let hr = &data(ctx)?.hr;
        hr.with_store_mut(move |store| store.remove_bookmarks(&ids))
            .await
            .map_err(to_api)
            .extend()
    }

    async fn set_search_query(&self, ctx: &Context<'_>, query: String) -> Result<FilterCriteria> {
        let hr = &data(ctx)?.hr;
        hr.with_store_mut(move |store| {
            store.set_search_query(query);
            store.filters().clone()
        })
        .await
        .map_err(to_api)
        .extend()
    }

    async fn set_selected_departments(
        &self,
        ctx: &Context<'_>,
        departments: Vec<Department>,
    ) -> Result<FilterCriteria> {
        let hr = &data(ctx)?.hr;
        let selected: BTreeSet<_> = departments.into_iter().collect();
        hr.with_store_mut(move |store| {
            store.set_selected_departments(selected);
            store.filters().clone()
        })
        .await
        .map_err(to_api)
        .extend()
    }

    async fn set_selected_ratings(&self, ctx: &Context<'_>, ratings: Vec<u8>) -> Result<FilterCriteria> {
        let hr = &data(ctx)?.hr;
        let selected: BTreeSet<_> = ratings.into_iter().collect();
        hr.with_store_mut(move |store| {
            store.set_selected_ratings(selected);
            store.filters().clone()
        })
        .await
        .map_err(to_api)
        .extend()
    }

    async fn clear_filters(&self, ctx: &Context<'_>) -> Result<FilterCriteria> {
        let hr = &data(ctx)?.hr;
        hr.with_store_mut(move |store| {
            store.clear_filters();
            store.filters().clone()
        })
        .await
        .map_err(to_api)
        .extend()
    }

    /// Simulated promotion request: waits, confirms, changes nothing.
    #[instrument(name = "graphql.promote", skip(self, ctx))]
    async fn promote(&self, ctx: &Context<'_>, ids: Vec<EmployeeId>) -> Result<PromotionNotice> {
        if ids.is_empty() {
            return Err(ApiError::InvalidInput("select at least one employee".into())).extend();
        }
        Ok(data(ctx)?.hr.promote(&ids).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::{ErrorExtensions, Value};

    #[tokio::test]
    async fn failed_store_task_is_masked_as_internal() {
        let join_err = tokio::spawn(async { panic!("disk went away") })
            .await
            .unwrap_err();
        let err = to_api(HrError::Task(join_err)).extend();
        assert_eq!(err.message, "internal server error");
        let code = err.extensions.as_ref().and_then(|map| map.get("code")).cloned();
        assert_eq!(code, Some(Value::from("INTERNAL")));
    }
}
