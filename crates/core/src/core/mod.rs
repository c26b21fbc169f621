//! CPU core: the five-stage pipeline engine and its functional units.
//!
//! The engine owns all architectural and micro-architectural state and
//! mutates it only from inside [`Cpu::cycle_step`]. One call advances the
//! whole machine by one clock: previous-cycle forwarding snapshots are
//! taken at the top, the stages run in reverse order (WB, MEM, EX, ID, IF),
//! and a pipeline snapshot is appended to the trace at the end.

/// Pipeline latches, signals, hazards, and stages.
pub mod pipeline;

/// Architectural register files.
pub mod registers;

/// Functional units (ALU, FPU, cache, branch prediction).
pub mod units;

use log::warn;

use crate::common::{sign_extend, AccessSize};
use crate::config::{CacheScheme, Config};
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, MemWbEntry};
use crate::core::pipeline::signals::{ControlSignals, MemWidth};
use crate::core::pipeline::{hazards, stages};
use crate::core::registers::RegisterFile;
use crate::core::units::bru::{Predictor, PredictorUnit};
use crate::core::units::cache::Cache;
use crate::isa::decode::Decoded;
use crate::isa::disasm;
use crate::mem::{DataMemory, MainMemory};
use crate::stats::CpuStatistics;
use crate::trace::{MemoryAccess, PipelineSnapshot, RawDependency, RegisterChange, StageView, Trace};

/// The simulated processor.
pub struct Cpu {
    /// Byte offset of the next instruction to fetch.
    pub(crate) pc: u32,
    /// Integer and floating-point register files.
    pub(crate) regs: RegisterFile,
    /// Floating-point control/status register. Present but never consulted
    /// by arithmetic.
    pub(crate) fcsr: u32,

    /// Program image, byte-addressable.
    imem: Vec<u8>,
    /// Fetch bound; a PC at or past this signals end-of-program.
    pub(crate) max_pc: u32,

    /// Data-memory device (backing store, possibly behind a cache).
    dmem: Box<dyn DataMemory>,
    /// Branch predictor.
    predictor: PredictorUnit,

    /// IF/ID latch.
    pub(crate) if_id: IfIdEntry,
    /// ID/EX latch.
    pub(crate) id_ex: IdExEntry,
    /// EX/MEM latch.
    pub(crate) ex_mem: ExMemEntry,
    /// MEM/WB latch.
    pub(crate) mem_wb: MemWbEntry,
    /// Previous-cycle EX/MEM snapshot, read only by forwarding.
    pub(crate) ex_mem_prev: ExMemEntry,
    /// Previous-cycle MEM/WB snapshot, read only by forwarding.
    pub(crate) mem_wb_prev: MemWbEntry,

    /// Load-use stall in effect: IF and ID hold.
    pub(crate) stall_flag: bool,
    /// Control-transfer flush pending: the next stage boundary squashes.
    pub(crate) flush_flag: bool,
    /// A stall occurred during the current cycle (bookkeeping).
    pub(crate) stall_this_cycle: bool,
    /// A flush occurred during the current cycle (bookkeeping).
    pub(crate) flush_this_cycle: bool,

    /// Prediction state for the conditional branch currently in flight.
    pub(crate) predicted_taken: bool,
    /// Predicted PC for that branch.
    pub(crate) predicted_target: u32,
    /// PC of that branch.
    pub(crate) branch_pc: u32,

    /// Aggregate run statistics.
    pub(crate) stats: CpuStatistics,
    /// Trace records (snapshots, memory/register logs, dependencies).
    pub(crate) trace: Trace,
    /// Capture memory/register/dependency logs.
    trace_enabled: bool,
    /// Dependency-record producer/consumer window, in cycles.
    dependency_window: u64,
    /// Verbose per-stage tracing to stderr.
    pub(crate) debug: bool,
}

impl Cpu {
    /// Creates a CPU from configuration: backing store of the configured
    /// size, optionally behind the configured cache, with the configured
    /// branch predictor.
    pub fn new(config: &Config) -> Self {
        Self {
            pc: 0,
            regs: RegisterFile::new(),
            fcsr: 0,
            imem: Vec::new(),
            max_pc: 0,
            dmem: Self::build_data_memory(config),
            predictor: PredictorUnit::new(&config.predictor),
            if_id: IfIdEntry::default(),
            id_ex: IdExEntry::default(),
            ex_mem: ExMemEntry::default(),
            mem_wb: MemWbEntry::default(),
            ex_mem_prev: ExMemEntry::default(),
            mem_wb_prev: MemWbEntry::default(),
            stall_flag: false,
            flush_flag: false,
            stall_this_cycle: false,
            flush_this_cycle: false,
            predicted_taken: false,
            predicted_target: 0,
            branch_pc: 0,
            stats: CpuStatistics::default(),
            trace: Trace::default(),
            trace_enabled: config.trace.enabled,
            dependency_window: config.trace.dependency_window,
            debug: false,
        }
    }

    /// Assembles the data-memory stack described by the configuration.
    fn build_data_memory(config: &Config) -> Box<dyn DataMemory> {
        let ram = Box::new(MainMemory::new(config.memory.size));
        let total = config.cache.total_size;
        let line = config.cache.line_size;
        match config.cache.scheme {
            CacheScheme::None => ram,
            CacheScheme::DirectMapped => Box::new(Cache::direct_mapped(ram, total, line)),
            CacheScheme::FullyAssociative => Box::new(Cache::fully_associative(ram, total, line)),
            CacheScheme::TwoWay => Box::new(Cache::set_associative(ram, total, line, 2)),
            CacheScheme::FourWay => Box::new(Cache::set_associative(ram, total, line, 4)),
            CacheScheme::EightWay => Box::new(Cache::set_associative(ram, total, line, 8)),
        }
    }

    /// Installs a program image. The fetch bound becomes the image size.
    pub fn load_program(&mut self, image: Vec<u8>) {
        self.max_pc = image.len() as u32;
        self.imem = image;
    }

    /// Enables or disables verbose per-stage tracing to stderr.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Advances the machine by one clock.
    pub fn cycle_step(&mut self) {
        self.stats.total_cycles += 1;
        self.stall_this_cycle = self.stall_flag;
        self.flush_this_cycle = self.flush_flag;

        // Snapshots first: EX must see what MEM and WB produced last cycle.
        self.ex_mem_prev = self.ex_mem.clone();
        self.mem_wb_prev = self.mem_wb.clone();

        stages::writeback_stage(self);
        stages::memory_stage(self);
        stages::execute_stage(self);
        stages::decode_stage(self);
        stages::fetch_stage(self);

        // The stall lasts until the stalling load has left ID/EX.
        if self.stall_flag && !self.id_ex.ctrl.mem_read {
            self.stall_flag = false;
        }

        if self.stall_this_cycle {
            self.stats.stall_cycles += 1;
        }
        if self.flush_this_cycle {
            self.stats.flush_cycles += 1;
        }

        if let Some((hits, misses)) = self.dmem.cache_stats() {
            self.stats.cache_hits = hits;
            self.stats.cache_misses = misses;
        }

        let snapshot = self.build_snapshot();
        self.trace.pipeline.push(snapshot);
    }

    /// Runs until the pipeline drains past the end of the program or the
    /// cycle budget is exhausted. Returns the number of cycles executed.
    pub fn run(&mut self, max_cycles: u64) -> u64 {
        let mut cycles = 0;
        while cycles < max_cycles {
            self.cycle_step();
            cycles += 1;
            if self.pipeline_empty() && self.pc >= self.max_pc {
                break;
            }
        }
        cycles
    }

    /// Whether every pipeline latch is invalid.
    pub fn pipeline_empty(&self) -> bool {
        !self.if_id.valid && !self.id_ex.valid && !self.ex_mem.valid && !self.mem_wb.valid
    }

    /// Restores the power-on state: PC, registers, FCSR, latches, snapshots,
    /// predictor, cache, statistics, and traces. The data-memory binding and
    /// the loaded program are preserved.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.regs.reset();
        self.fcsr = 0;
        self.if_id = IfIdEntry::default();
        self.id_ex = IdExEntry::default();
        self.ex_mem = ExMemEntry::default();
        self.mem_wb = MemWbEntry::default();
        self.ex_mem_prev = ExMemEntry::default();
        self.mem_wb_prev = MemWbEntry::default();
        self.stall_flag = false;
        self.flush_flag = false;
        self.stall_this_cycle = false;
        self.flush_this_cycle = false;
        self.predicted_taken = false;
        self.predicted_target = 0;
        self.branch_pc = 0;
        self.predictor.reset();
        self.dmem.reset_state();
        self.stats = CpuStatistics::default();
        self.trace.clear();
    }

    // ── Accessors ─────────────────────────────────────────

    /// Current program counter.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Fetch bound reported by the loader.
    pub fn max_pc(&self) -> u32 {
        self.max_pc
    }

    /// Value of integer register `idx`.
    pub fn register(&self, idx: usize) -> u32 {
        self.regs.read(idx)
    }

    /// Bit pattern of floating-point register `idx`.
    pub fn fp_register(&self, idx: usize) -> u32 {
        self.regs.read_f(idx)
    }

    /// Floating-point control/status register.
    pub fn fcsr(&self) -> u32 {
        self.fcsr
    }

    /// Aggregate statistics of the run so far.
    pub fn stats(&self) -> &CpuStatistics {
        &self.stats
    }

    /// Trace records of the run so far.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Discards all trace records.
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// The installed branch predictor (for accuracy reporting).
    pub fn predictor(&self) -> &PredictorUnit {
        &self.predictor
    }

    /// Writes directly through the data-memory device, e.g. to preload a
    /// program's working set. Counts as a regular access on any configured
    /// cache.
    pub fn store_data(&mut self, addr: u32, value: u32, size: AccessSize) -> bool {
        self.dmem.store(addr, value, size)
    }

    // ── Fetch helpers ─────────────────────────────────────

    /// Reads a little-endian 16-bit parcel from the program image.
    pub(crate) fn fetch_half(&self, pc: u32) -> Option<u16> {
        let idx = pc as usize;
        let bytes = self.imem.get(idx..idx + 2)?;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a little-endian 32-bit word from the program image.
    pub(crate) fn fetch_word(&self, pc: u32) -> Option<u32> {
        let idx = pc as usize;
        let bytes = self.imem.get(idx..idx + 4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    // ── Predictor access ──────────────────────────────────

    /// Consults the predictor for the conditional branch at `pc`.
    pub(crate) fn predict_branch(&self, pc: u32, taken_target: u32) -> (bool, u32) {
        self.predictor.predict(pc, taken_target)
    }

    /// Trains the predictor with a resolved conditional branch.
    pub(crate) fn update_predictor(&mut self, pc: u32, target: u32, taken: bool) {
        self.predictor.update(pc, target, taken);
    }

    // ── Data-memory access (alignment enforced here) ──────

    /// Reads data memory with the given width, sign- or zero-extending the
    /// result. Misaligned or out-of-range accesses are reported and yield
    /// zero; the pipeline always advances.
    pub(crate) fn read_memory(&mut self, addr: u32, width: MemWidth, signed: bool) -> u32 {
        let Some(size) = Self::access_size(width) else {
            return 0;
        };
        if !Self::check_alignment(addr, size) {
            return 0;
        }
        let Some(value) = self.dmem.load(addr, size) else {
            warn!("memory read out of range at address {addr:#x}");
            return 0;
        };
        match (size, signed) {
            (AccessSize::Byte, true) => sign_extend(value as i32, 8) as u32,
            (AccessSize::Half, true) => sign_extend(value as i32, 16) as u32,
            _ => value,
        }
    }

    /// Writes data memory with the given width. Misaligned or out-of-range
    /// stores are reported and dropped.
    pub(crate) fn write_memory(&mut self, addr: u32, value: u32, width: MemWidth) {
        let Some(size) = Self::access_size(width) else {
            return;
        };
        if !Self::check_alignment(addr, size) {
            return;
        }
        if !self.dmem.store(addr, value, size) {
            warn!("memory write out of range at address {addr:#x}");
        }
    }

    fn access_size(width: MemWidth) -> Option<AccessSize> {
        match width {
            MemWidth::None => None,
            MemWidth::Byte => Some(AccessSize::Byte),
            MemWidth::Half => Some(AccessSize::Half),
            MemWidth::Word => Some(AccessSize::Word),
        }
    }

    /// Halfword accesses require 2-byte alignment, word accesses 4-byte.
    fn check_alignment(addr: u32, size: AccessSize) -> bool {
        let aligned = match size {
            AccessSize::Byte => true,
            AccessSize::Half => addr % 2 == 0,
            AccessSize::Word => addr % 4 == 0,
        };
        if !aligned {
            warn!(
                "unaligned {}-byte access at address {addr:#x}",
                size.bytes()
            );
        }
        aligned
    }

    /// Current (hits, misses) of the cache, if one is configured.
    pub(crate) fn cache_sample(&self) -> Option<(u64, u64)> {
        self.dmem.cache_stats()
    }

    /// Whether the hit counter advanced since `before` was sampled.
    pub(crate) fn cache_hit_since(&self, before: Option<(u64, u64)>) -> bool {
        match (before, self.dmem.cache_stats()) {
            (Some((hits_before, _)), Some((hits_after, _))) => hits_after > hits_before,
            _ => false,
        }
    }

    // ── Trace capture ─────────────────────────────────────

    /// Appends a memory-access record.
    pub(crate) fn log_memory_access(
        &mut self,
        address: u32,
        width: MemWidth,
        is_write: bool,
        value: u32,
        pc: u32,
        cache_hit: bool,
    ) {
        if !self.trace_enabled {
            return;
        }
        let width = Self::access_size(width).map_or(0, AccessSize::bytes);
        self.trace.memory.push(MemoryAccess {
            cycle: self.stats.total_cycles,
            address,
            width,
            is_write,
            value,
            pc,
            cache_hit,
        });
    }

    /// Appends a register-change record.
    pub(crate) fn log_register_change(&mut self, reg: usize, old: u32, new: u32, pc: u32) {
        if !self.trace_enabled || reg == 0 {
            return;
        }
        self.trace.registers.push(RegisterChange {
            cycle: self.stats.total_cycles,
            reg,
            old_value: old,
            new_value: new,
            pc,
        });
    }

    /// Updates the PC-to-cycle and PC-to-destination maps at retirement.
    pub(crate) fn note_retirement(&mut self, pc: u32, rd: usize, reg_write: bool) {
        if !self.trace_enabled {
            return;
        }
        self.trace.pc_to_cycle.insert(pc, self.stats.total_cycles);
        if reg_write && rd != 0 {
            self.trace.pc_to_rd.insert(pc, rd);
        }
    }

    /// Emits read-after-write dependency records for the instruction being
    /// decoded, for producers retired within the dependency window.
    pub(crate) fn track_dependencies(&mut self, d: &Decoded, ctrl: &ControlSignals) {
        if !self.trace_enabled {
            return;
        }
        let cycle = self.stats.total_cycles;
        let consumer_pc = self.if_id.pc;

        let mut sources = [0usize; 2];
        let mut count = 0;
        if hazards::reads_int_rs1(ctrl) && d.rs1 != 0 {
            sources[count] = d.rs1;
            count += 1;
        }
        if hazards::reads_int_rs2(ctrl) && d.rs2 != 0 {
            sources[count] = d.rs2;
            count += 1;
        }

        let mut found = Vec::new();
        for &reg in &sources[..count] {
            for (&producer_pc, &rd) in &self.trace.pc_to_rd {
                if rd != reg || producer_pc == consumer_pc {
                    continue;
                }
                let producer_cycle = self.trace.pc_to_cycle.get(&producer_pc).copied().unwrap_or(0);
                if cycle.saturating_sub(producer_cycle) <= self.dependency_window {
                    found.push(RawDependency {
                        producer_pc,
                        consumer_pc,
                        reg,
                        producer_cycle,
                        consumer_cycle: cycle,
                    });
                }
            }
        }
        self.trace.dependencies.extend(found);
    }

    // ── Snapshot capture ──────────────────────────────────

    /// Builds the end-of-cycle pipeline snapshot.
    fn build_snapshot(&self) -> PipelineSnapshot {
        let if_id = if self.if_id.valid {
            StageView {
                valid: true,
                pc: self.if_id.pc,
                instruction: Some(self.if_id.raw),
                disassembly: Self::disassemble_entry(
                    self.if_id.is_compressed,
                    self.if_id.compressed_raw,
                    self.if_id.raw,
                ),
                datum: None,
            }
        } else {
            StageView::default()
        };

        let id_ex = if self.id_ex.valid {
            StageView {
                valid: true,
                pc: self.id_ex.pc,
                instruction: Some(self.id_ex.inst),
                disassembly: Self::disassemble_entry(
                    self.id_ex.is_compressed,
                    self.id_ex.compressed_raw,
                    self.id_ex.inst,
                ),
                datum: None,
            }
        } else {
            StageView::default()
        };

        let ex_mem = if self.ex_mem.valid {
            StageView {
                valid: true,
                pc: self.ex_mem.pc,
                instruction: Some(self.ex_mem.inst),
                disassembly: disasm::disassemble(self.ex_mem.inst),
                datum: Some(self.ex_mem.alu_result),
            }
        } else {
            StageView::default()
        };

        let mem_wb = if self.mem_wb.valid {
            let write_data = if self.mem_wb.ctrl.mem_to_reg {
                self.mem_wb.mem_data
            } else {
                self.mem_wb.alu_result
            };
            StageView {
                valid: true,
                pc: self.mem_wb.pc,
                instruction: Some(self.mem_wb.inst),
                disassembly: disasm::disassemble(self.mem_wb.inst),
                datum: Some(write_data),
            }
        } else {
            StageView::default()
        };

        PipelineSnapshot {
            cycle: self.stats.total_cycles,
            stall: self.stall_this_cycle,
            flush: self.flush_this_cycle,
            if_id,
            id_ex,
            ex_mem,
            mem_wb,
        }
    }

    fn disassemble_entry(is_compressed: bool, compressed_raw: u16, raw: u32) -> String {
        if is_compressed {
            disasm::disassemble_compressed(compressed_raw, raw)
        } else {
            disasm::disassemble(raw)
        }
    }
}
