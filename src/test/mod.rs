use std::sync::Once;

use crate::patch::{FieldOverride, FuncOverride, ParamOverride, PatchTable, TypeOverride};

// Installs a subscriber writing through the test harness, once per test binary
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

// Helper function to create a table touching every node kind
pub fn create_full_table() -> PatchTable {
    PatchTable::new()
        .with_func(
            FuncOverride::new("FileSystem", "CreateFileW")
                .param(ParamOverride::new("lpSecurityAttributes").optional())
                .param(ParamOverride::new("lpFileName").constant()),
        )
        .with_type(
            TypeOverride::new("Gdi", "BITMAPINFO")
                .field(FieldOverride::new("bmiColors").with_type("RGBQUAD*")),
        )
        .with_type(
            TypeOverride::new("Gdi", "DEVMODEW").nested(
                TypeOverride::new("Gdi", "_Anonymous1").field(FieldOverride::new("dmPosition")),
            ),
        )
        .with_type(
            TypeOverride::new("Com", "IStream").method(
                FuncOverride::new("Com", "Write").param(ParamOverride::new("pv").constant()),
            ),
        )
        .with_type(TypeOverride::new("WindowsAccessibility", "IUIAutomation6").remove())
}
