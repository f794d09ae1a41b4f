/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! host interface for progress reporting and cooperative cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// what a processing host provides to a multi-step job
pub trait ProcessingFeedback {
    /// called after each completed step (1-based)
    fn set_current_step (&self, step: usize);

    fn is_canceled (&self) -> bool;
}

/// feedback for standalone runs that logs progress and gets canceled through a shared flag
/// (e.g. from a ctrl-c handler)
pub struct LogFeedback {
    n_steps: usize,
    canceled: Arc<AtomicBool>
}

impl LogFeedback {
    pub fn new (n_steps: usize) -> Self {
        LogFeedback { n_steps, canceled: Arc::new( AtomicBool::new(false)) }
    }

    pub fn cancel_flag (&self) -> Arc<AtomicBool> { self.canceled.clone() }
}

impl ProcessingFeedback for LogFeedback {
    fn set_current_step (&self, step: usize) {
        info!("step {}/{} done", step, self.n_steps);
    }

    fn is_canceled (&self) -> bool {
        self.canceled.load( Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag() {
        let feedback = LogFeedback::new( 6);
        assert!( !feedback.is_canceled());

        let flag = feedback.cancel_flag();
        flag.store( true, Ordering::Relaxed);
        assert!( feedback.is_canceled());
    }
}
