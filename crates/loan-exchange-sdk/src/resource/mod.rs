//! 资源客户端 - 把 Store 的生命周期事件与 REST 调用串起来
//!
//! 每个操作的顺序固定：dispatch Requested → 发请求 → dispatch Succeeded / Failed，
//! 返回结算后的快照。传输错误在这里被吸收为 Failed 事件，不会抛给调用方。

mod query;
mod filters;

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ErrorPayload, LoanExchangeSDKError, Result};
use crate::models::{Entity, EntityId};
use crate::store::{EntityAction, EntityState, EntityStore, OperationKind};
use crate::transport::{clean_entity, list_query, ApiRequest, ApiResponse, CacheBuster, EntityTransport};

pub use query::{ListRequest, QueryFilter, SortOrder, SortSpec};
pub use filters::{BalanceLogFilter, DealFilter, NotificationFilter};

/// 单个资源的 CRUD 客户端
pub struct EntityClient<E: Entity> {
    store: Arc<EntityStore<E>>,
    transport: Arc<dyn EntityTransport>,
    /// 集合路径，例如 `api/deals`
    collection_path: String,
    cache_buster: Arc<CacheBuster>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for EntityClient<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            transport: self.transport.clone(),
            collection_path: self.collection_path.clone(),
            cache_buster: self.cache_buster.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> EntityClient<E> {
    pub fn new(
        store: Arc<EntityStore<E>>,
        transport: Arc<dyn EntityTransport>,
        collection_path: impl Into<String>,
        cache_buster: Arc<CacheBuster>,
    ) -> Self {
        Self {
            store,
            transport,
            collection_path: collection_path.into(),
            cache_buster,
            _marker: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<EntityStore<E>> {
        &self.store
    }

    pub fn collection_path(&self) -> &str {
        &self.collection_path
    }

    /// 当前快照
    pub fn state(&self) -> EntityState<E> {
        self.store.snapshot()
    }

    fn item_path(&self, id: EntityId) -> String {
        format!("{}/{}", self.collection_path, id)
    }

    /// 拉取一页，追加到 `entities`
    pub async fn get_entities(&self, request: ListRequest) -> EntityState<E> {
        let sort = request.sort.as_ref().map(|s| s.to_string());
        self.store.dispatch(EntityAction::ListRequested {
            page: request.page,
            size: request.size,
            sort: sort.clone(),
        });

        let query = list_query(
            request.page,
            request.size,
            sort.as_deref(),
            &request.filter,
            self.cache_buster.next(),
        );
        let result = self
            .transport
            .send(ApiRequest::get(self.collection_path.clone()).with_query(query))
            .await
            .and_then(|response| {
                let items = decode_list::<E>(response.body.clone())?;
                Ok((items, response))
            });

        match result {
            Ok((items, response)) => self.store.dispatch(EntityAction::ListSucceeded {
                items,
                link_header: header(&response, "link"),
                total_count_header: header(&response, "x-total-count"),
            }),
            Err(e) => self.fail(OperationKind::FetchList, e),
        }
    }

    /// 拉取单个实体到 `entity`
    pub async fn get_entity(&self, id: EntityId) -> EntityState<E> {
        self.store.dispatch(EntityAction::SingleRequested { id });

        let result = self
            .transport
            .send(ApiRequest::get(self.item_path(id)))
            .await
            .and_then(|response| match response.body {
                None | Some(Value::Null) => Err(LoanExchangeSDKError::NotFound(format!("{} {}", E::RESOURCE, id))),
                body => decode_one::<E>(body),
            });

        match result {
            Ok(entity) => self.store.dispatch(EntityAction::SingleSucceeded(entity)),
            Err(e) => self.fail(OperationKind::FetchOne, e),
        }
    }

    /// 创建实体
    ///
    /// 客户端校验不通过时返回 `Validation` 错误，不发请求也不产生事件。
    pub async fn create_entity(&self, draft: E) -> Result<EntityState<E>> {
        let body = prepare_body(&draft)?;
        self.store.dispatch(EntityAction::CreateRequested(draft));

        let result = self
            .transport
            .send(ApiRequest::post(self.collection_path.clone(), body))
            .await
            .and_then(|response| decode_one::<E>(response.body));

        Ok(match result {
            Ok(saved) => {
                info!("✅ {} 已创建: {:?}", E::RESOURCE, saved.id());
                self.store.dispatch(EntityAction::CreateSucceeded(saved))
            }
            Err(e) => self.fail(OperationKind::Create, e),
        })
    }

    /// 更新实体（PUT 到集合路径，id 在 body 中）
    pub async fn update_entity(&self, entity: E) -> Result<EntityState<E>> {
        let body = prepare_body(&entity)?;
        self.store.dispatch(EntityAction::UpdateRequested(entity));

        let result = self
            .transport
            .send(ApiRequest::put(self.collection_path.clone(), body))
            .await
            .and_then(|response| decode_one::<E>(response.body));

        Ok(match result {
            Ok(saved) => {
                info!("✅ {} 已更新: {:?}", E::RESOURCE, saved.id());
                self.store.dispatch(EntityAction::UpdateSucceeded(saved))
            }
            Err(e) => self.fail(OperationKind::Update, e),
        })
    }

    /// 删除实体，成功后 `entity` 变为空实体
    pub async fn delete_entity(&self, id: EntityId) -> EntityState<E> {
        self.store.dispatch(EntityAction::DeleteRequested { id });

        match self.transport.send(ApiRequest::delete(self.item_path(id))).await {
            Ok(_) => {
                info!("✅ {} 已删除: {}", E::RESOURCE, id);
                self.store.dispatch(EntityAction::DeleteSucceeded)
            }
            Err(e) => self.fail(OperationKind::Delete, e),
        }
    }

    /// 同步重置，不取消在途请求
    pub fn reset(&self) -> EntityState<E> {
        self.store.reset()
    }

    fn fail(&self, operation: OperationKind, error: LoanExchangeSDKError) -> EntityState<E> {
        self.store.dispatch(EntityAction::Failed {
            operation,
            error: ErrorPayload::from(&error),
        })
    }
}

fn header(response: &ApiResponse, name: &str) -> Option<String> {
    response.header(name).map(str::to_string)
}

/// 校验并序列化待提交的实体
fn prepare_body<E: Entity>(entity: &E) -> Result<Value> {
    let errors = entity.validate();
    if !errors.is_empty() {
        warn!("{} 客户端校验失败: {:?}", E::RESOURCE, errors);
        return Err(LoanExchangeSDKError::Validation(errors));
    }
    Ok(clean_entity(serde_json::to_value(entity)?))
}

fn decode_list<E: Entity>(body: Option<Value>) -> Result<Vec<E>> {
    match body {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}

fn decode_one<E: Entity>(body: Option<Value>) -> Result<E> {
    match body {
        None | Some(Value::Null) => Err(LoanExchangeSDKError::Serialization(format!(
            "{} 响应缺少实体",
            E::RESOURCE
        ))),
        Some(value) => Ok(serde_json::from_value(value)?),
    }
}
