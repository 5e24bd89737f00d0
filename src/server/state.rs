use crate::cleanup::CleanupClient;
use crate::ocr::TesseractOcr;
use crate::settings::Settings;

pub(crate) struct ServerState {
    pub(crate) settings: Settings,
    pub(crate) engine: TesseractOcr,
    pub(crate) cleanup: CleanupClient,
}
