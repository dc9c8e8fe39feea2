use super::{SwanClient, require};
use crate::error::Result;
use crate::model::{DealStatusUpdate, DealUpdate, OfflineDeal, OfflineDealPage, TaskDeals};
use crate::transport::{FormBody, RequestBody, TransportRequest};

impl SwanClient {
    /// Offline deals of a miner in a given status, first page only.
    ///
    /// `limit` falls back to the session's deal limit.
    pub async fn get_offline_deals(
        &self,
        miner_fid: &str,
        status: &str,
        limit: Option<usize>,
    ) -> Result<Vec<OfflineDeal>> {
        self.observed("get_offline_deals", async {
            require(miner_fid, "miner fid")?;
            require(status, "deal status")?;

            let url = self.endpoint(&format!(
                "/offline_deals/{}?deal_status={}&limit={}&offset=0",
                urlencoding::encode(miner_fid),
                urlencoding::encode(status),
                limit.unwrap_or(self.deal_limit),
            ));

            let page: OfflineDealPage = self.call(self.authorized(TransportRequest::get(url))).await?;
            Ok(page.deal)
        })
        .await
    }

    /// Move a deal to `status`, reporting whichever details are present
    pub async fn update_offline_deal_status(
        &self,
        deal_id: i64,
        status: &str,
        update: &DealStatusUpdate,
    ) -> Result<DealUpdate> {
        self.observed("update_offline_deal_status", async {
            require(status, "deal status")?;

            let url = self.endpoint(&format!("/my_miner/deals/{}", deal_id));
            let body = RequestBody::Form(status_form(status, update));

            self.call(self.authorized(TransportRequest::put(url).with_body(body)))
                .await
        })
        .await
    }

    /// Deals, bids and miner recorded against one task
    pub async fn get_offline_deals_by_task_uuid(&self, task_uuid: &str) -> Result<TaskDeals> {
        self.observed("get_offline_deals_by_task_uuid", async {
            require(task_uuid, "task uuid")?;

            let url = self.endpoint(&format!("/tasks/{}", urlencoding::encode(task_uuid)));
            self.call(self.authorized(TransportRequest::get(url))).await
        })
        .await
    }
}

/// `status` first, then each present detail in a fixed order
fn status_form(status: &str, update: &DealStatusUpdate) -> FormBody {
    FormBody::new()
        .field("status", status)
        .field_opt("note", update.note.as_deref())
        .field_opt("file_path", update.file_path.as_deref())
        .field_opt("file_size", update.file_size)
}
