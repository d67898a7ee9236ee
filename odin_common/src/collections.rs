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

use std::collections::VecDeque;

/// a VecDeque that is used as a bounded ringbuffer, i.e. that drops the oldest entries once
/// its capacity limit is reached. Note that `VecDeque::with_capacity()` only guarantees a lower
/// bound so we have to keep the limit explicitly
pub trait RingDeque<T> {
    fn push_to_ringbuffer (&mut self, limit: usize, t: T);
    fn last_entry (&self)->Option<&T>;
}

impl<T> RingDeque<T> for VecDeque<T> {
    #[inline]
    fn push_to_ringbuffer (&mut self, limit: usize, t: T) {
        if limit == 0 { return }
        while self.len() >= limit {
            self.pop_front();
        }
        self.push_back(t)
    }

    #[inline]
    fn last_entry (&self)->Option<&T> { self.back() }
}
