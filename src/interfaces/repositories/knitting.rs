use async_trait::async_trait;
use reqwest::Method;

use crate::{
    constants::{
        KNITTING_CREATE_PATH, KNITTING_DELETE_PATH, KNITTING_INFO_PATH, KNITTING_LIST_PATH,
        KNITTING_UPDATE_PATH,
    },
    entities::{
        common::{EmptyDto, PageDto, PaginationEx},
        knitting::{KnittingDeleteReq, KnittingInfoReq, KnittingInfoRes, KnittingListRes},
        knitting_form::KnittingForm,
        picture::SubResource,
    },
    errors::AppError,
    http::{
        query::{QueryClient, QueryKey, QueryKeyName},
        upload::{MultipartPayload, ProgressCallback},
    },
};

/// Remote record store behind the views.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnittingRepository: Sync + Send {
    async fn list(&self, params: PageDto) -> Result<PaginationEx<KnittingListRes>, AppError>;
    async fn info(&self, id: i64) -> Result<KnittingInfoRes, AppError>;
    async fn create(
        &self,
        form: &KnittingForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<EmptyDto, AppError>;
    async fn update(
        &self,
        form: &KnittingForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<EmptyDto, AppError>;
    async fn delete(&self, id: i64) -> Result<EmptyDto, AppError>;
    async fn delete_sub_resource(&self, target: SubResource) -> Result<EmptyDto, AppError>;
    /// Where the image content of `target` can be fetched from.
    fn preview_url(&self, target: SubResource) -> String;
}

#[derive(Debug, Clone)]
pub struct HttpKnittingRepo {
    query: QueryClient,
}

impl HttpKnittingRepo {
    pub fn new(query: QueryClient) -> Self {
        HttpKnittingRepo { query }
    }
}

#[async_trait]
impl KnittingRepository for HttpKnittingRepo {
    async fn list(&self, params: PageDto) -> Result<PaginationEx<KnittingListRes>, AppError> {
        let key = QueryKey::new(QueryKeyName::ReadKnittingList, &params)?;
        self.query.get(&key, KNITTING_LIST_PATH, &params).await
    }

    async fn info(&self, id: i64) -> Result<KnittingInfoRes, AppError> {
        let params = KnittingInfoReq { id };
        let key = QueryKey::new(QueryKeyName::ReadKnittingInfo, &params)?;
        self.query.get(&key, KNITTING_INFO_PATH, &params).await
    }

    async fn create(
        &self,
        form: &KnittingForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<EmptyDto, AppError> {
        let payload = MultipartPayload::from_form(form);
        self.query
            .send_multipart(Method::POST, KNITTING_CREATE_PATH, payload, on_progress)
            .await
    }

    async fn update(
        &self,
        form: &KnittingForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<EmptyDto, AppError> {
        let payload = MultipartPayload::from_form(form);
        self.query
            .send_multipart(Method::PUT, KNITTING_UPDATE_PATH, payload, on_progress)
            .await
    }

    async fn delete(&self, id: i64) -> Result<EmptyDto, AppError> {
        self.query
            .delete(KNITTING_DELETE_PATH, &KnittingDeleteReq { id })
            .await
    }

    async fn delete_sub_resource(&self, target: SubResource) -> Result<EmptyDto, AppError> {
        self.query
            .delete(&target.kind.delete_path(), &target.delete_request())
            .await
    }

    fn preview_url(&self, target: SubResource) -> String {
        let mut url = match self.query.url(&target.kind.preview_path()) {
            Ok(url) => url,
            Err(_) => return String::new(),
        };
        url.query_pairs_mut().append_pair("id", &target.id.to_string());
        url.to_string()
    }
}
