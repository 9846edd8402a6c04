use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

#[derive(Clone)]
pub struct DispatchMetrics {
    pub activations: IntCounter,
    pub deactivations: IntCounter,
    pub undos: IntCounter,
    pub rejected: IntCounter,
    pub bound_slots: IntGauge,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub dispatch: DispatchMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let counter = |name: &str, help: &str| {
            IntCounter::new(name, help).map_err(|e| format!("metrics init error: {e}"))
        };
        let activations = counter("remote_activations_total", "Activate button presses")?;
        let deactivations = counter("remote_deactivations_total", "Deactivate button presses")?;
        let undos = counter("remote_undos_total", "Undo button presses")?;
        let rejected = counter(
            "remote_rejected_total",
            "Calls rejected for an out-of-range slot",
        )?;
        let bound_slots = IntGauge::new("remote_bound_slots", "Slots holding a non-empty binding")
            .map_err(|e| format!("metrics init error: {e}"))?;
        let dispatch = DispatchMetrics {
            activations,
            deactivations,
            undos,
            rejected,
            bound_slots,
        };
        let register = |c: Box<dyn prometheus::core::Collector>| {
            registry
                .register(c)
                .map_err(|e| format!("metrics register error: {e}"))
        };
        register(Box::new(dispatch.activations.clone()))?;
        register(Box::new(dispatch.deactivations.clone()))?;
        register(Box::new(dispatch.undos.clone()))?;
        register(Box::new(dispatch.rejected.clone()))?;
        register(Box::new(dispatch.bound_slots.clone()))?;
        Ok(Self { registry, dispatch })
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
