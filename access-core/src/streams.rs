use crate::geolocation::PositionFix;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type PositionSender = UnboundedSender<PositionFix>;
pub type PositionStream = UnboundedReceiver<PositionFix>;

pub fn position_channel() -> (PositionSender, PositionStream) {
    mpsc::unbounded()
}
