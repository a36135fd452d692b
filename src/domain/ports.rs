use crate::utils::error::Result;
use async_trait::async_trait;

/// 原始設定文件的來源 (本機檔案、內嵌字串等)
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn read_raw(&self) -> Result<Vec<u8>>;

    /// 用於日誌與錯誤訊息
    fn describe(&self) -> String;
}
