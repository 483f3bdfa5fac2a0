use np_core::PayoutService;
use np_export::ExportOptions;

pub struct AppState {
    pub service: PayoutService,
    pub export: ExportOptions,
    pub articles_per_page: usize,
}
