use crate::sync::{LeaderboardEntry, ProgressBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Refresco periódico del leaderboard.
///
/// El poller corre en su propia tarea y envía cada tanda de filas por el
/// canal. Hay que pararlo con `stop` cuando la vista que lo consume deja
/// de estar activa, para que ninguna actualización llegue después de
/// desmontarla; soltar el poller (o el receptor del canal) también lo
/// detiene.
pub struct LeaderboardPoller {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl LeaderboardPoller {
    pub fn start(
        backend: Arc<dyn ProgressBackend>,
        every: Duration,
        updates: mpsc::UnboundedSender<Vec<LeaderboardEntry>>,
    ) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match backend.leaderboard().await {
                            Ok(rows) => {
                                // Receptor muerto: la vista ya no existe.
                                if updates.send(rows).is_err() {
                                    break;
                                }
                            }
                            // Un fallo puntual no detiene el refresco.
                            Err(err) => log::warn!("no se pudo refrescar el leaderboard: {err}"),
                        }
                    }
                    _ = &mut stop_rx => break,
                }
            }
            log::debug!("poller de leaderboard detenido");
        });
        Self {
            stop_tx: Some(stop_tx),
            handle,
        }
    }

    /// Cancela el refresco. La tarea termina en el siguiente punto de
    /// espera; no se aborta a mitad de una petición.
    pub fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProgressSnapshot;
    use crate::sync::MemoryBackend;

    #[tokio::test]
    async fn entrega_filas_y_se_detiene_con_stop() {
        let backend = Arc::new(MemoryBackend::new());
        backend.seed(
            "ana",
            ProgressSnapshot {
                xp: 120,
                streak: 3,
                ..Default::default()
            },
        );

        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = LeaderboardPoller::start(
            Arc::clone(&backend) as Arc<dyn ProgressBackend>,
            Duration::from_millis(10),
            tx,
        );

        // El primer tick es inmediato.
        let rows = rx.recv().await.expect("primera tanda");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, "ana");
        assert_eq!(rows[0].xp, 120);

        poller.stop();

        // Con la tarea parada el emisor se suelta y el canal se agota.
        while rx.recv().await.is_some() {}
    }

    #[tokio::test]
    async fn soltar_el_receptor_detiene_la_tarea() {
        let backend = Arc::new(MemoryBackend::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = LeaderboardPoller::start(
            backend as Arc<dyn ProgressBackend>,
            Duration::from_millis(5),
            tx,
        );

        drop(rx);
        // El siguiente envío fracasa y la tarea sale del bucle.
        for _ in 0..100 {
            if poller.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(poller.is_finished());
    }
}
