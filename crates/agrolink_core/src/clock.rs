//! Abstração de tempo para os loops cooperativos.
//!
//! Os dois binários são loops sequenciais com delays bloqueantes
//! (amostragem 10×5 ms, cadência de 10 s, pacing de 500 ms, janela de
//! reconexão 30×500 ms). Passar o relógio por trait permite testar a
//! cadência sem esperas reais de parede.

use std::time::Duration;

/// Fonte de sleeps bloqueantes.
pub trait Clock {
    fn sleep(&self, dur: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn sleep(&self, dur: Duration) {
        (**self).sleep(dur);
    }
}

/// Relógio real: `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Relógio virtual para testes: registra os sleeps pedidos sem dormir.
#[derive(Debug, Default)]
pub struct ManualClock {
    slept: std::cell::RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps registrados, na ordem em que foram pedidos.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.borrow().clone()
    }

    /// Tempo virtual total decorrido.
    pub fn total_slept(&self) -> Duration {
        self.slept.borrow().iter().sum()
    }
}

impl Clock for ManualClock {
    fn sleep(&self, dur: Duration) {
        self.slept.borrow_mut().push(dur);
    }
}
