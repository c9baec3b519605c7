//! Request handler - authorizes envelopes and routes them to the engine

use crate::auth::Authorizer;
use crate::dispatch::{DispatchEngine, MedicationInput, RegisterDrone};
use crate::error::DispatchError;
use fleet_shared::{
    envelope::Payload, BatteryLevel, DroneInfo, Envelope, FailureKind, MedicationItem, Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns one request envelope into exactly one response envelope
pub struct RequestHandler {
    server_id: String,
    engine: DispatchEngine,
    authorizer: Arc<dyn Authorizer>,
    sequence_id: AtomicU64,
}

impl RequestHandler {
    pub fn new(
        server_id: impl Into<String>,
        engine: DispatchEngine,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        Self {
            server_id: server_id.into(),
            engine,
            authorizer,
            sequence_id: AtomicU64::new(0),
        }
    }

    fn next_sequence_id(&self) -> u64 {
        self.sequence_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub async fn handle(&self, envelope: Envelope) -> Envelope {
        let response = self.respond(envelope).await;
        Envelope::response(&self.server_id, self.next_sequence_id(), response)
    }

    async fn respond(&self, envelope: Envelope) -> Response {
        let header = match envelope.header {
            Some(h) => h,
            None => {
                warn!("[SERVER] Rejected envelope without header");
                return Response::unauthorized(0);
            }
        };
        let seq = header.sequence_id;

        if !self.authorizer.authorize(&header) {
            warn!("[SERVER] Rejected request {} from {:?}: bad credentials", seq, header.client_id);
            return Response::unauthorized(seq);
        }

        debug!("[SERVER] Request {} from {}", seq, header.client_id);

        let result = match envelope.payload {
            Some(Payload::RegisterDrone(req)) => self.register(seq, req).await,
            Some(Payload::LoadDrone(req)) => self.load(seq, req).await,
            Some(Payload::AvailableDrones(_)) => self.available(seq).await,
            Some(Payload::BatteryLevel(req)) => self.battery(seq, &req.serial_number).await,
            Some(Payload::LoadedMedications(req)) => {
                self.loaded_medications(seq, &req.serial_number).await
            }
            Some(Payload::Response(_)) | None => {
                return Response::failed(seq, FailureKind::FailureMalformed, "Not a request");
            }
        };

        result.unwrap_or_else(|e| Response::failed(seq, e.kind(), e.to_string()))
    }

    async fn register(
        &self,
        seq: u64,
        req: fleet_shared::RegisterDrone,
    ) -> Result<Response, DispatchError> {
        let drone = self
            .engine
            .register_drone(RegisterDrone {
                serial_number: req.serial_number,
                model: req.model,
                weight_limit: (req.weight_limit != 0).then_some(req.weight_limit),
                battery_capacity: req.battery_capacity,
                state: req.state,
            })
            .await?;

        let mut resp = Response::success(seq, "Drone registration was successful");
        resp.drones.push(DroneInfo::from(&drone));
        resp.drone_state = drone.state.into();
        Ok(resp)
    }

    async fn load(&self, seq: u64, req: fleet_shared::LoadDrone) -> Result<Response, DispatchError> {
        let batch = req
            .medications
            .into_iter()
            .map(|m| MedicationInput {
                name: m.name,
                code: m.code,
                weight: m.weight,
                image: m.image,
            })
            .collect();

        let outcome = self.engine.load_drone(&req.serial_number, batch).await?;

        let mut resp = Response::success(
            seq,
            format!(
                "Medications loaded, drone {} is {} ({}/{})",
                outcome.serial_number, outcome.state, outcome.total_weight, outcome.weight_limit
            ),
        );
        resp.drone_state = outcome.state.into();
        Ok(resp)
    }

    async fn available(&self, seq: u64) -> Result<Response, DispatchError> {
        let drones = self.engine.available_drones().await?;

        let message = if drones.is_empty() {
            "No drone(s) available".to_string()
        } else {
            format!("{} drone(s) available", drones.len())
        };
        let mut resp = Response::success(seq, message);
        resp.drones = drones.iter().map(DroneInfo::from).collect();
        Ok(resp)
    }

    async fn battery(&self, seq: u64, serial_number: &str) -> Result<Response, DispatchError> {
        let status = self.engine.battery_level(serial_number).await?;

        let mut resp = Response::success(seq, "Drone found");
        resp.battery = Some(BatteryLevel {
            serial_number: status.serial_number,
            model: status.model.into(),
            battery_capacity: status.battery_capacity,
        });
        Ok(resp)
    }

    async fn loaded_medications(
        &self,
        seq: u64,
        serial_number: &str,
    ) -> Result<Response, DispatchError> {
        let medications = self.engine.loaded_medications(serial_number).await?;

        let mut resp = Response::success(seq, format!("{} medication(s) on record", medications.len()));
        resp.medications = medications.iter().map(MedicationItem::from).collect();
        Ok(resp)
    }
}
