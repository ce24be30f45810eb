//! Shared three-dimensional tables of 16-bit values.
//!
//! Map data, tile flags and flash colours all live in [`Table`]s. A table is owned by
//! whoever created it and shared by reference with the tilemap, which subscribes to
//! its change notifications.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_engine::observer::{ObserverList, Subscription};

/// Plain table storage, x fastest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    xsize: usize,
    ysize: usize,
    zsize: usize,
    data: Vec<i16>,
}

impl TableGrid {
    pub fn new(xsize: usize, ysize: usize, zsize: usize) -> Self {
        Self { xsize, ysize, zsize, data: vec![0; xsize * ysize * zsize] }
    }

    pub fn xsize(&self) -> usize {
        self.xsize
    }

    pub fn ysize(&self) -> usize {
        self.ysize
    }

    pub fn zsize(&self) -> usize {
        self.zsize
    }

    fn index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        (x < self.xsize && y < self.ysize && z < self.zsize)
            .then(|| x + self.xsize * (y + self.ysize * z))
    }

    /// Value at (`x`, `y`, `z`); 0 outside the table.
    pub fn get(&self, x: usize, y: usize, z: usize) -> i16 {
        self.index(x, y, z).map_or(0, |i| self.data[i])
    }

    /// Writes one cell. Returns false (and writes nothing) outside the table.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: i16) -> bool {
        match self.index(x, y, z) {
            Some(i) => {
                self.data[i] = value;
                true
            }
            None => false,
        }
    }

    /// Reads with `x` and `y` wrapped around the map. Layers do not wrap: a layer the
    /// table lacks reads 0, as do empty tables.
    pub fn get_wrapped(&self, x: i32, y: i32, z: i32) -> i16 {
        let Ok(z) = usize::try_from(z) else {
            return 0;
        };
        if self.data.is_empty() {
            return 0;
        }
        let wrap = |v: i32, size: usize| v.rem_euclid(size as i32) as usize;
        self.get(wrap(x, self.xsize), wrap(y, self.ysize), z)
    }

    /// Changes the dimensions, keeping values in the overlapping region.
    pub fn resize(&mut self, xsize: usize, ysize: usize, zsize: usize) {
        let mut next = TableGrid::new(xsize, ysize, zsize);
        for z in 0..zsize.min(self.zsize) {
            for y in 0..ysize.min(self.ysize) {
                for x in 0..xsize.min(self.xsize) {
                    next.set(x, y, z, self.get(x, y, z));
                }
            }
        }
        *self = next;
    }
}

struct TableInner {
    grid: RefCell<TableGrid>,
    observers: ObserverList,
}

/// Shared, observable table. Clones refer to the same storage.
#[derive(Clone)]
pub struct Table {
    inner: Rc<TableInner>,
}

impl Table {
    pub fn new(xsize: usize, ysize: usize, zsize: usize) -> Self {
        Self::from_grid(TableGrid::new(xsize, ysize, zsize))
    }

    pub fn from_grid(grid: TableGrid) -> Self {
        Self {
            inner: Rc::new(TableInner { grid: RefCell::new(grid), observers: ObserverList::new() }),
        }
    }

    pub fn xsize(&self) -> usize {
        self.inner.grid.borrow().xsize()
    }

    pub fn ysize(&self) -> usize {
        self.inner.grid.borrow().ysize()
    }

    pub fn zsize(&self) -> usize {
        self.inner.grid.borrow().zsize()
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> i16 {
        self.inner.grid.borrow().get(x, y, z)
    }

    pub fn get_wrapped(&self, x: i32, y: i32, z: i32) -> i16 {
        self.inner.grid.borrow().get_wrapped(x, y, z)
    }

    /// Writes one cell and notifies observers. Out-of-range writes are ignored.
    pub fn set(&self, x: usize, y: usize, z: usize, value: i16) {
        let written = self.inner.grid.borrow_mut().set(x, y, z, value);
        if written {
            self.inner.observers.notify();
        }
    }

    pub fn resize(&self, xsize: usize, ysize: usize, zsize: usize) {
        self.inner.grid.borrow_mut().resize(xsize, ysize, zsize);
        self.inner.observers.notify();
    }

    /// Applies a batch of writes with a single notification.
    pub fn edit<R>(&self, f: impl FnOnce(&mut TableGrid) -> R) -> R {
        let result = f(&mut self.inner.grid.borrow_mut());
        self.inner.observers.notify();
        result
    }

    /// Runs `f` against the current contents without copying them.
    pub fn with_grid<R>(&self, f: impl FnOnce(&TableGrid) -> R) -> R {
        f(&self.inner.grid.borrow())
    }

    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.observers.subscribe(callback)
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grid = self.inner.grid.borrow();
        f.debug_struct("Table")
            .field("xsize", &grid.xsize())
            .field("ysize", &grid.ysize())
            .field("zsize", &grid.zsize())
            .finish()
    }
}
