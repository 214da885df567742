//! Timing statistics for configuration counting.
//!
//! Records how long each configuration took to count along with its
//! inner-loop cost, so a run can report its iteration throughput and how the
//! work was spread across configurations.

const BUCKETS: usize = 20;

/// Tracks per-configuration counting times.
///
/// Times land in power-of-two microsecond buckets: bucket `i` holds
/// configurations that took less than `2^i` microseconds, with the last
/// bucket open ended. Trackers from different workers combine with
/// [`ConfigTimings::merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTimings {
    pub min: u64,
    pub max: u64,
    pub sum: u64,
    pub count: u64,
    pub iterations: u64,
    pub buckets: [u64; BUCKETS],
}

impl Default for ConfigTimings {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTimings {
    pub fn new() -> Self {
        Self {
            min: u64::MAX,
            max: 0,
            sum: 0,
            count: 0,
            iterations: 0,
            buckets: [0; BUCKETS],
        }
    }

    fn bucket(nanos: u64) -> usize {
        let micros = nanos / 1_000;
        ((u64::BITS - micros.leading_zeros()) as usize).min(BUCKETS - 1)
    }

    /// Records one configuration that took `nanos` and ran `cost` inner
    /// iterations.
    pub fn update(&mut self, nanos: u64, cost: u64) {
        self.min = self.min.min(nanos);
        self.max = self.max.max(nanos);
        self.sum += nanos;
        self.count += 1;
        self.iterations += cost;
        self.buckets[Self::bucket(nanos)] += 1;
    }

    pub fn merge(&mut self, other: &ConfigTimings) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.sum += other.sum;
        self.count += other.count;
        self.iterations += other.iterations;
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *mine += theirs;
        }
    }

    /// Average nanoseconds per configuration, or 0.0 if nothing was recorded.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum as f64 / self.count as f64
        }
    }

    /// Inner-loop iterations per second of summed worker time.
    pub fn iterations_per_second(&self) -> f64 {
        if self.sum == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.sum as f64 / 1e9)
        }
    }

    pub fn print_report(&self) {
        println!("\nConfiguration Timings (worker time)");
        println!("Count: {}", self.count);
        if self.count == 0 {
            return;
        }
        println!("Min:   {:.2} ms", self.min as f64 / 1e6);
        println!("Avg:   {:.2} ms", self.avg() / 1e6);
        println!("Max:   {:.2} ms", self.max as f64 / 1e6);
        println!("Iterations: {} ({:.3e}/s)", self.iterations, self.iterations_per_second());

        println!("Distribution (log2 us buckets):");
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let open = if i == BUCKETS - 1 { ">" } else { "" };
                println!("[< 2^{:2}{} us]: {}", i, open, count);
            }
        }
    }
}
