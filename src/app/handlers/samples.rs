use log::trace;

use crate::app::app_core::BubbleLevelApp;

pub struct SampleHandler;

impl SampleHandler {
    pub fn handle_samples(app: &mut BubbleLevelApp) {
        // 未注册（隐藏或暂停）时，注销前已在途的样本直接丢弃
        let accept = app.state.wants_samples() && app.sensor.is_registered();
        let applied = app.state.drain_samples(accept);
        if applied > 0 {
            trace!("Applied {} samples this frame", applied);
        }

        if !app.sensor.is_running() {
            app.state.mark_sensor_stopped();
        }
    }
}
