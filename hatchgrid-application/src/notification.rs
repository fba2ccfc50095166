/// 应用层通知（Notification）
///
/// 已发生事实的广播：同一通知可以有任意多个处理器（包括零个），按注册顺序投递，
/// 投递方式由 [`PublishStrategy`](crate::publish::PublishStrategy) 决定。
pub trait Notification: Send + Sync + 'static {
    const NAME: &'static str;
}
