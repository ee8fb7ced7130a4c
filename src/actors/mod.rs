// Actor模块 - 使用Actor模式管理并发状态
//
// 整理任务的开始/取消/结束来自不同调用方，通过消息传递串行化，
// 只对状态转换本身互斥，而不是锁住整个任务

pub mod run_state;

pub use run_state::{
    AutomationRunState, RunStateActor, RunStateCommand, RunStateHandle, RunStatus, RunTicket,
};
