use crate::{AssistantMsg, ConversionMsg, TargetFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host changed the shared target format.
    FormatSelected(TargetFormat),
    /// Input for the conversion panel (user actions and timer ticks).
    Conversion(ConversionMsg),
    /// Input for the assistant panel.
    Assistant(AssistantMsg),
}

impl From<ConversionMsg> for Msg {
    fn from(msg: ConversionMsg) -> Self {
        Msg::Conversion(msg)
    }
}

impl From<AssistantMsg> for Msg {
    fn from(msg: AssistantMsg) -> Self {
        Msg::Assistant(msg)
    }
}
